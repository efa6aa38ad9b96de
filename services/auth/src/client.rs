//! REST client for the backend authentication endpoints
//!
//! Every successful login or registration stores the session; logout and
//! failed refreshes clear it. Backend error bodies are `{message}` and the
//! message becomes the error text.

use std::sync::Arc;

use common::{settings::Settings, storage::SessionStorage};
use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    error::{AuthError, AuthResult},
    models::{
        ChangePasswordRequest, ErrorBody, LoginRequest, PasswordResetRequest, ProfileUpdate,
        RegisterRequest, RegistrationForm, ResetPasswordRequest, Session, User,
    },
    session::SessionStore,
    validation,
};

/// Authentication service: the backend auth endpoints wired to the session store
#[derive(Clone)]
pub struct AuthService {
    http: Client,
    base_url: String,
    store: SessionStore,
}

impl AuthService {
    /// Create a new auth service for the given API base URL
    pub fn new(base_url: impl Into<String>, storage: Arc<dyn SessionStorage>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            store: SessionStore::new(storage),
        }
    }

    /// Create a new auth service from the loaded settings
    pub fn from_settings(settings: &Settings, storage: Arc<dyn SessionStorage>) -> Self {
        Self::new(settings.api_url.clone(), storage)
    }

    /// The underlying session store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Log in with email and password
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<Session> {
        validation::validate_login(email, password).map_err(AuthError::Validation)?;
        info!("Login attempt for user: {}", email);

        let request = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, password });

        let body = match send(request, "Login failed").await {
            Ok(body) => body,
            Err(AuthError::Rejected { status, message }) if (400..500).contains(&status) => {
                warn!("Login rejected for user: {} ({})", email, status);
                return Err(AuthError::InvalidCredentials(message));
            }
            Err(e) => return Err(e),
        };

        let session: Session = serde_json::from_value(body)?;
        self.store.save(&session).await?;

        info!("User logged in: {}", session.user.id);
        Ok(session)
    }

    /// Register a new account; the backend performs uniqueness checks
    pub async fn register(&self, username: &str, email: &str, password: &str) -> AuthResult<Session> {
        if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::Validation("Please fill in all fields".to_string()));
        }
        info!("Registration attempt for user: {}", username);

        let request = self.http.post(self.url("/auth/register")).json(&RegisterRequest {
            username,
            email,
            password,
        });

        let body = send(request, "Registration failed").await?;
        let session: Session = serde_json::from_value(body)?;
        self.store.save(&session).await?;

        info!("User registered: {}", session.user.id);
        Ok(session)
    }

    /// Validate the sign-up form, then register
    pub async fn register_with_confirmation(&self, form: &RegistrationForm) -> AuthResult<Session> {
        validation::validate_registration(form).map_err(AuthError::Validation)?;
        self.register(form.username.trim(), form.email.trim(), &form.password)
            .await
    }

    /// Log out. The backend is notified on a best-effort basis; the local
    /// session is always cleared.
    pub async fn logout(&self) {
        match self.store.token().await {
            Ok(Some(token)) => {
                let request = self.http.post(self.url("/auth/logout")).bearer_auth(&token);
                if let Err(e) = send(request, "Logout failed").await {
                    warn!("Logout notification failed: {}", e);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to read session token during logout: {}", e),
        }

        if let Err(e) = self.store.clear().await {
            error!("Failed to clear session during logout: {}", e);
        }
    }

    /// Whether a token is stored. This is not a validity check.
    pub async fn is_authenticated(&self) -> bool {
        self.store.is_authenticated().await
    }

    /// Ask the backend whether the stored token is still accepted
    pub async fn validate_token(&self) -> bool {
        let token = match self.store.token().await {
            Ok(Some(token)) => token,
            Ok(None) => return false,
            Err(e) => {
                warn!("Failed to read session token: {}", e);
                return false;
            }
        };

        match self
            .http
            .get(self.url("/auth/validate"))
            .bearer_auth(&token)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Token validation request failed: {}", e);
                false
            }
        }
    }

    /// Bearer header for authenticated requests; empty when no token is stored
    pub async fn auth_header(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let token = match self.store.token().await {
            Ok(Some(token)) => token,
            Ok(None) => return headers,
            Err(e) => {
                warn!("Failed to read session token: {}", e);
                return headers;
            }
        };

        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(value) => {
                headers.insert(AUTHORIZATION, value);
            }
            Err(e) => warn!("Stored token is not a valid header value: {}", e),
        }

        headers
    }

    /// Cached profile of the logged-in user
    pub async fn current_user(&self) -> AuthResult<Option<User>> {
        self.store.user().await
    }

    /// Fetch the profile of the logged-in user without touching the cache
    pub async fn get_current_user(&self) -> AuthResult<User> {
        let token = self.require_token().await?;
        let request = self.http.get(self.url("/auth/me")).bearer_auth(&token);

        let body = send(request, "Failed to fetch user data").await?;
        Ok(User::from_response(body)?)
    }

    /// Re-fetch the profile and cache it. Any failure clears the session.
    pub async fn refresh_user_data(&self) -> Option<User> {
        let token = match self.store.token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.discard_session().await;
                return None;
            }
            Err(e) => {
                warn!("Failed to read session token: {}", e);
                self.discard_session().await;
                return None;
            }
        };

        let user = match self.get_current_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!("Failed to refresh user data, clearing session: {}", e);
                self.discard_session().await;
                return None;
            }
        };

        let session = Session { token, user };
        if let Err(e) = self.store.save(&session).await {
            warn!("Failed to store refreshed user data, clearing session: {}", e);
            self.discard_session().await;
            return None;
        }

        Some(session.user)
    }

    /// Send a partial profile update and merge the returned fields into the cached profile
    pub async fn update_profile(&self, update: &ProfileUpdate) -> AuthResult<User> {
        let Some(Session { token, user: cached }) = self.store.session().await? else {
            return Err(AuthError::NotAuthenticated);
        };
        info!("Updating profile for user: {}", cached.id);

        let request = self
            .http
            .put(self.url("/auth/profile"))
            .bearer_auth(&token)
            .json(update);
        let body = send(request, "Profile update failed").await?;

        let fields = match body {
            Value::Object(mut object) => match object.remove("user") {
                Some(Value::Object(user)) => user,
                Some(other) => {
                    object.insert("user".to_string(), other);
                    object
                }
                None => object,
            },
            _ => serde_json::Map::new(),
        };

        let user = cached.merged_with(&fields)?;

        self.store.update_user(&user).await?;
        Ok(user)
    }

    /// Change the password of the logged-in user
    pub async fn change_password(&self, current_password: &str, new_password: &str) -> AuthResult<String> {
        if current_password.is_empty() {
            return Err(AuthError::Validation("Current password is required".to_string()));
        }
        validation::validate_password(new_password).map_err(AuthError::Validation)?;
        let token = self.require_token().await?;

        let request = self
            .http
            .post(self.url("/auth/change-password"))
            .bearer_auth(&token)
            .json(&ChangePasswordRequest {
                current_password,
                new_password,
            });

        let body = send(request, "Password change failed").await?;
        Ok(message_or(body, "Password changed successfully"))
    }

    /// Ask the backend to send a password reset email
    pub async fn request_password_reset(&self, email: &str) -> AuthResult<String> {
        validation::validate_email(email).map_err(AuthError::Validation)?;
        info!("Password reset requested for: {}", email);

        let request = self
            .http
            .post(self.url("/auth/request-reset"))
            .json(&PasswordResetRequest { email });

        let body = send(request, "Password reset request failed").await?;
        Ok(message_or(body, "Password reset email sent"))
    }

    /// Complete a password reset with the token from the reset email
    pub async fn reset_password(&self, reset_token: &str, new_password: &str) -> AuthResult<String> {
        if reset_token.trim().is_empty() {
            return Err(AuthError::Validation("Reset token is required".to_string()));
        }
        validation::validate_password(new_password).map_err(AuthError::Validation)?;

        let request = self
            .http
            .post(self.url("/auth/reset-password"))
            .json(&ResetPasswordRequest {
                token: reset_token,
                new_password,
            });

        let body = send(request, "Password reset failed").await?;
        Ok(message_or(body, "Password has been reset"))
    }

    async fn require_token(&self) -> AuthResult<String> {
        self.store.token().await?.ok_or(AuthError::NotAuthenticated)
    }

    async fn discard_session(&self) {
        if let Err(e) = self.store.clear().await {
            error!("Failed to clear session: {}", e);
        }
    }
}

/// Send a request and decode the JSON body of a success response
async fn send(request: RequestBuilder, fallback: &str) -> AuthResult<Value> {
    let response = request.send().await?;
    read_body(response, fallback).await
}

async fn read_body(response: Response, fallback: &str) -> AuthResult<Value> {
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_str(&text)?);
    }

    Err(rejection(status, &text, fallback))
}

fn rejection(status: StatusCode, body: &str, fallback: &str) -> AuthError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());

    AuthError::Rejected {
        status: status.as_u16(),
        message,
    }
}

fn message_or(body: Value, fallback: &str) -> String {
    serde_json::from_value::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| fallback.to_string())
}
