//! In-process fake of the FarmSight backend auth API
//!
//! Serves the `/api/auth/*` endpoints from memory on an ephemeral port so
//! the client can be exercised end to end.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Map, Value, json};
use tokio::{net::TcpListener, sync::Mutex};

/// A registered account
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub extra: Map<String, Value>,
}

impl StoredUser {
    fn profile(&self) -> Value {
        let mut profile = json!({
            "id": self.id,
            "username": self.username,
            "email": self.email,
        });
        if let Value::Object(object) = &mut profile {
            object.extend(self.extra.clone());
        }
        profile
    }
}

/// Backend state, inspectable from tests
#[derive(Debug, Default)]
pub struct BackendState {
    pub users: Vec<StoredUser>,
    pub tokens: HashMap<String, u64>,
    pub logout_calls: usize,
    pub reset_requests: Vec<String>,
    /// Make `/auth/me` answer 500
    pub fail_profile: bool,
    /// Make error responses plain text instead of `{message}`
    pub plain_text_errors: bool,
    /// Status used to refuse a login, 401 when unset
    pub login_rejection: Option<StatusCode>,
    issued: u64,
}

impl BackendState {
    fn issue_token(&mut self, user_id: u64) -> String {
        self.issued += 1;
        let token = format!("token-{}-{}", user_id, self.issued);
        self.tokens.insert(token.clone(), user_id);
        token
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<&StoredUser> {
        let token = bearer(headers)?;
        let id = self.tokens.get(&token)?;
        self.users.iter().find(|user| user.id == *id)
    }

    /// Revoke every issued token
    pub fn revoke_all(&mut self) {
        self.tokens.clear();
    }
}

type SharedState = Arc<Mutex<BackendState>>;

/// Running fake backend
pub struct FakeBackend {
    pub base_url: String,
    pub state: SharedState,
}

impl FakeBackend {
    /// Start the fake backend on an ephemeral port
    pub async fn spawn() -> Self {
        let state: SharedState = Arc::new(Mutex::new(BackendState::default()));
        let app = create_router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind fake backend");
        let addr = listener.local_addr().expect("fake backend has no address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend crashed");
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    /// Register an account directly in the backend state
    pub async fn seed_user(&self, username: &str, email: &str, password: &str) {
        let mut state = self.state.lock().await;
        let id = state.users.len() as u64 + 1;
        let mut extra = Map::new();
        extra.insert("farmName".to_string(), json!(format!("{}'s farm", username)));
        state.users.push(StoredUser {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            extra,
        });
    }
}

/// Create the router for the fake auth API
fn create_router(state: SharedState) -> Router {
    let auth = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/validate", get(validate))
        .route("/auth/logout", post(logout))
        .route("/auth/profile", put(update_profile))
        .route("/auth/change-password", post(change_password))
        .route("/auth/request-reset", post(request_reset))
        .route("/auth/reset-password", post(reset_password));

    Router::new().nest("/api", auth).with_state(state)
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    header.strip_prefix("Bearer ").map(str::to_string)
}

fn field<'a>(body: &'a Value, name: &str) -> &'a str {
    body.get(name).and_then(Value::as_str).unwrap_or_default()
}

/// Error answered by the fake backend
struct FakeError {
    status: StatusCode,
    message: &'static str,
    plain_text: bool,
}

impl FakeError {
    fn new(state: &BackendState, status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            plain_text: state.plain_text_errors,
        }
    }
}

impl IntoResponse for FakeError {
    fn into_response(self) -> Response {
        if self.plain_text {
            return (self.status, "upstream exploded").into_response();
        }
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

async fn register(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, FakeError> {
    let mut state = state.lock().await;
    let email = field(&body, "email").to_string();

    if state.users.iter().any(|user| user.email == email) {
        return Err(FakeError::new(&state, StatusCode::CONFLICT, "User already exists"));
    }

    let id = state.users.len() as u64 + 1;
    let user = StoredUser {
        id,
        username: field(&body, "username").to_string(),
        email,
        password: field(&body, "password").to_string(),
        extra: Map::new(),
    };
    let profile = user.profile();
    state.users.push(user);
    let token = state.issue_token(id);

    Ok((StatusCode::CREATED, Json(json!({ "token": token, "user": profile }))))
}

async fn login(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, FakeError> {
    let mut state = state.lock().await;

    let found = state
        .users
        .iter()
        .find(|user| user.email == field(&body, "email") && user.password == field(&body, "password"))
        .map(|user| (user.id, user.profile()));

    let rejection = state.login_rejection;
    if let Some(status) = rejection.filter(StatusCode::is_server_error) {
        return Err(FakeError::new(&state, status, "Internal server error"));
    }

    let Some((id, profile)) = found else {
        let status = rejection.unwrap_or(StatusCode::UNAUTHORIZED);
        return Err(FakeError::new(&state, status, "Invalid credentials"));
    };

    let token = state.issue_token(id);
    Ok(Json(json!({ "token": token, "user": profile })))
}

async fn me(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, FakeError> {
    let state = state.lock().await;

    if state.fail_profile {
        return Err(FakeError::new(
            &state,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
        ));
    }

    match state.user_for(&headers) {
        Some(user) => Ok(Json(user.profile())),
        None => Err(FakeError::new(&state, StatusCode::UNAUTHORIZED, "Unauthorized")),
    }
}

async fn validate(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, FakeError> {
    let state = state.lock().await;

    match state.user_for(&headers) {
        Some(_) => Ok(Json(json!({ "valid": true }))),
        None => Err(FakeError::new(&state, StatusCode::UNAUTHORIZED, "Invalid token")),
    }
}

async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> impl IntoResponse {
    let mut state = state.lock().await;
    state.logout_calls += 1;
    if let Some(token) = bearer(&headers) {
        state.tokens.remove(&token);
    }
    Json(json!({ "message": "Logged out successfully" }))
}

async fn update_profile(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, FakeError> {
    let mut state = state.lock().await;

    let Some(id) = state.user_for(&headers).map(|user| user.id) else {
        return Err(FakeError::new(&state, StatusCode::UNAUTHORIZED, "Unauthorized"));
    };
    let plain_text = state.plain_text_errors;
    let Some(user) = state.users.iter_mut().find(|user| user.id == id) else {
        return Err(FakeError {
            status: StatusCode::NOT_FOUND,
            message: "User not found",
            plain_text,
        });
    };

    if let Value::Object(fields) = body {
        for (key, value) in fields {
            match key.as_str() {
                "username" => user.username = value.as_str().unwrap_or_default().to_string(),
                "email" => user.email = value.as_str().unwrap_or_default().to_string(),
                _ => {
                    user.extra.insert(key, value);
                }
            }
        }
    }

    Ok(Json(json!({ "message": "Profile updated", "user": user.profile() })))
}

async fn change_password(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, FakeError> {
    let mut state = state.lock().await;

    let Some(id) = state.user_for(&headers).map(|user| user.id) else {
        return Err(FakeError::new(&state, StatusCode::UNAUTHORIZED, "Unauthorized"));
    };

    let current = field(&body, "currentPassword").to_string();
    let new_password = field(&body, "newPassword").to_string();

    let plain_text = state.plain_text_errors;
    let Some(user) = state.users.iter_mut().find(|user| user.id == id) else {
        return Err(FakeError {
            status: StatusCode::NOT_FOUND,
            message: "User not found",
            plain_text,
        });
    };

    if user.password != current {
        return Err(FakeError {
            status: StatusCode::BAD_REQUEST,
            message: "Current password is incorrect",
            plain_text,
        });
    }

    user.password = new_password;
    Ok(Json(json!({ "message": "Password updated" })))
}

async fn request_reset(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut state = state.lock().await;
    state.reset_requests.push(field(&body, "email").to_string());
    Json(json!({ "message": "If the account exists, a reset email has been sent" }))
}

async fn reset_password(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, FakeError> {
    let mut state = state.lock().await;

    let token = field(&body, "token").to_string();
    let new_password = field(&body, "newPassword").to_string();
    let email = token.strip_prefix("reset-").unwrap_or_default().to_string();

    let plain_text = state.plain_text_errors;
    match state.users.iter_mut().find(|user| user.email == email) {
        Some(user) => {
            user.password = new_password;
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(FakeError {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid or expired reset token",
            plain_text,
        }),
    }
}
