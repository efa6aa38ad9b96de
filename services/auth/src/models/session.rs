//! Session model

use serde::{Deserialize, Serialize};

use super::User;

/// Authenticated client session: the bearer token and the profile it belongs to
///
/// Login and registration responses have exactly this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}
