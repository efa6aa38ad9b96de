//! Client settings
//!
//! Settings are layered: built-in defaults, then an optional `farmsight`
//! config file (any format the `config` crate understands), then
//! `FARMSIGHT_*` environment variables.

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// Which storage backend holds the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Memory,
    File,
    Redis,
}

/// Settings shared by the FarmSight crates
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base URL of the backend REST API
    pub api_url: String,
    /// Session storage backend
    pub storage: StorageKind,
    /// Session file used by the `file` backend
    pub storage_path: PathBuf,
    /// Redis URL used by the `redis` backend
    pub redis_url: String,
    /// Prefix for session keys in Redis
    pub redis_key_prefix: String,
    /// Alternative disease catalog (JSON); the built-in catalog is used when unset
    pub catalog_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api".to_string(),
            storage: StorageKind::File,
            storage_path: PathBuf::from(".farmsight/session.json"),
            redis_url: "redis://localhost:6379".to_string(),
            redis_key_prefix: "farmsight:".to_string(),
            catalog_path: None,
        }
    }
}

impl Settings {
    /// Load settings from `farmsight.{toml,json,yaml}` in the working directory and the environment
    ///
    /// # Environment Variables
    /// - `FARMSIGHT_API_URL`
    /// - `FARMSIGHT_STORAGE`: `memory`, `file` or `redis`
    /// - `FARMSIGHT_STORAGE_PATH`
    /// - `FARMSIGHT_REDIS_URL`
    /// - `FARMSIGHT_REDIS_KEY_PREFIX`
    /// - `FARMSIGHT_CATALOG_PATH`
    pub fn load() -> StorageResult<Self> {
        Self::load_from("farmsight")
    }

    /// Load settings using the given config file name (extension optional)
    pub fn load_from(file_name: &str) -> StorageResult<Self> {
        let defaults = Settings::default();

        let settings = Config::builder()
            .set_default("api_url", defaults.api_url)
            .and_then(|b| b.set_default("storage", "file"))
            .and_then(|b| {
                b.set_default(
                    "storage_path",
                    defaults.storage_path.to_string_lossy().into_owned(),
                )
            })
            .and_then(|b| b.set_default("redis_url", defaults.redis_url))
            .and_then(|b| b.set_default("redis_key_prefix", defaults.redis_key_prefix))
            .map_err(|e| StorageError::Configuration(e.to_string()))?
            .add_source(File::with_name(file_name).required(false))
            .add_source(Environment::with_prefix("FARMSIGHT"))
            .build()
            .map_err(|e| StorageError::Configuration(e.to_string()))?
            .try_deserialize::<Settings>()
            .map_err(|e| StorageError::Configuration(e.to_string()))?;

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }
}
