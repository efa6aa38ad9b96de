pub mod auth;
pub mod diagnose;
