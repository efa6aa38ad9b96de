//! Session persistence on top of the injected storage
//!
//! The session is two entries: the raw token under [`TOKEN_KEY`] and the
//! JSON profile under [`USER_KEY`]. They are written and removed in one
//! storage call.

use std::sync::Arc;

use common::storage::SessionStorage;
use tracing::{info, warn};

use crate::{
    error::{AuthError, AuthResult},
    models::{Session, User},
};

/// Storage key of the bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key of the serialized user profile
pub const USER_KEY: &str = "user";

/// Session store: single source of truth for the logged-in user
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Create a session store over the given storage
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Persist token and user together
    pub async fn save(&self, session: &Session) -> AuthResult<()> {
        info!("Saving session for user: {}", session.user.id);

        let user = serde_json::to_string(&session.user)?;
        self.storage
            .set_entries(&[(TOKEN_KEY, session.token.as_str()), (USER_KEY, user.as_str())])
            .await?;

        Ok(())
    }

    /// Replace the cached profile, keeping the token
    pub async fn update_user(&self, user: &User) -> AuthResult<()> {
        let token = self.token().await?.ok_or(AuthError::NotAuthenticated)?;

        let user_json = serde_json::to_string(user)?;
        self.storage
            .set_entries(&[(TOKEN_KEY, token.as_str()), (USER_KEY, user_json.as_str())])
            .await?;

        Ok(())
    }

    /// Remove token and user together
    pub async fn clear(&self) -> AuthResult<()> {
        info!("Clearing session");
        self.storage.remove_entries(&[TOKEN_KEY, USER_KEY]).await?;
        Ok(())
    }

    /// Stored token, if any. An empty entry counts as no token.
    pub async fn token(&self) -> AuthResult<Option<String>> {
        let token = self.storage.get(TOKEN_KEY).await?;
        Ok(token.filter(|token| !token.is_empty()))
    }

    /// Stored profile, only when the token is present as well
    pub async fn user(&self) -> AuthResult<Option<User>> {
        if self.token().await?.is_none() {
            return Ok(None);
        }

        match self.storage.get(USER_KEY).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Stored session, only when both entries are present
    pub async fn session(&self) -> AuthResult<Option<Session>> {
        let Some(token) = self.token().await? else {
            return Ok(None);
        };

        Ok(self.user().await?.map(|user| Session { token, user }))
    }

    /// Whether a token is stored; says nothing about its validity
    pub async fn is_authenticated(&self) -> bool {
        match self.token().await {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!("Failed to read session token: {}", e);
                false
            }
        }
    }
}
