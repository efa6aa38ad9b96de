//! Authentication client for the FarmSight backend
//!
//! [`SessionStore`] keeps the token and user profile in the injected
//! storage; [`AuthService`] performs the REST calls and keeps the store in
//! step with their outcome.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use auth::AuthService;
//! use common::storage::MemoryStorage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = AuthService::new("http://localhost:5000/api", Arc::new(MemoryStorage::new()));
//!     let session = service.login("amina@farm.test", "Abcdef1").await?;
//!     println!("Logged in as {}", session.user.username);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod session;
pub mod validation;

pub use client::AuthService;
pub use error::{AuthError, AuthResult};
pub use session::SessionStore;
