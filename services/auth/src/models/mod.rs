//! Authentication client models

pub mod requests;
pub mod session;
pub mod user;

// Re-export for convenience
pub use requests::{
    ChangePasswordRequest, ErrorBody, LoginRequest, PasswordResetRequest, ProfileUpdate,
    RegisterRequest, RegistrationForm, ResetPasswordRequest,
};
pub use session::Session;
pub use user::User;
