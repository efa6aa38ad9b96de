//! Common library for the FarmSight client
//!
//! This crate provides functionality shared by the FarmSight crates:
//! the durable key/value storage the session lives in, its error types
//! and the settings loaded from file and environment.
//!
//! ```rust,no_run
//! use common::settings::Settings;
//! use common::storage::open_storage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load()?;
//!     let storage = open_storage(&settings).await?;
//!     let token = storage.get("token").await?;
//!     println!("Token present: {}", token.is_some());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod file;
pub mod settings;
pub mod storage;
