//! Redis session storage for the FarmSight client
//!
//! This module provides a Redis-backed [`SessionStorage`] so several
//! client processes on one machine can share a session. Multi-entry writes
//! use `MSET` and removals a single `DEL`, both atomic on the server.

use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use tracing::info;

use crate::{error::StorageResult, storage::SessionStorage};

/// Configuration for Redis connection
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379")
    pub url: String,
    /// Prefix prepended to every session key
    pub key_prefix: String,
}

/// Session storage backed by Redis
pub struct RedisStorage {
    client: Client,
    key_prefix: String,
}

impl RedisStorage {
    /// Initialize a new Redis storage
    pub async fn new(config: &RedisConfig) -> StorageResult<Self> {
        let client = Client::open(config.url.clone())?;
        info!("Redis client initialized with URL: {}", config.url);
        Ok(RedisStorage {
            client,
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// Get a connection from the client
    async fn get_connection(&self) -> StorageResult<redis::aio::MultiplexedConnection> {
        let conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn)
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    /// Check if Redis is reachable
    pub async fn health_check(&self) -> StorageResult<bool> {
        let mut conn = self.get_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}

#[async_trait]
impl SessionStorage for RedisStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = conn.get(self.key(key)).await?;
        Ok(value)
    }

    async fn set_entries(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let items: Vec<(String, &str)> = entries
            .iter()
            .map(|(key, value)| (self.key(key), *value))
            .collect();

        let mut conn = self.get_connection().await?;
        let _: () = conn.mset(items.as_slice()).await?;
        Ok(())
    }

    async fn remove_entries(&self, keys: &[&str]) -> StorageResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let keys: Vec<String> = keys.iter().map(|key| self.key(key)).collect();

        let mut conn = self.get_connection().await?;
        let _: u64 = conn.del(keys).await?;
        Ok(())
    }
}
