//! Registration, login and session endpoints

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use brewlog_common::models::{SafeUser, User};

use crate::api::error::ApiError;
use crate::api::session::{self, AuthSession};
use crate::{db, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub password: String,
}

impl RegisterRequest {
    fn validate(&self) -> Vec<String> {
        let mut details = Vec::new();

        if self.username.len() < 3 || self.username.len() > 30 {
            details.push("username must be between 3 and 30 characters".to_string());
        }
        if !self
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            details.push(
                "username may only contain letters, digits and underscores".to_string(),
            );
        }
        if !self.email.contains('@') || self.email.starts_with('@') || self.email.ends_with('@') {
            details.push("email address is invalid".to_string());
        }
        if self.display_name.is_empty() || self.display_name.len() > 100 {
            details.push("display name must be between 1 and 100 characters".to_string());
        }
        if self.password.len() < 6 {
            details.push("password must be at least 6 characters".to_string());
        }

        details
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email address
    pub username: String,
    pub password: String,
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

async fn start_session(state: &AppState, user_id: Uuid) -> Result<String, ApiError> {
    let token = session::generate_token();
    let expires_at = Utc::now() + Duration::days(state.session_ttl_days);
    db::sessions::create(&state.db, &token, user_id, expires_at).await?;
    Ok(token)
}

/// POST /api/auth/register
///
/// Creates the user and starts a session in one step.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let details = request.validate();
    if !details.is_empty() {
        return Err(ApiError::Validation(details));
    }

    if db::users::get_by_username(&state.db, &request.username)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Username already in use".to_string()));
    }
    if db::users::get_by_email(&state.db, &request.email)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Email already in use".to_string()));
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        username: request.username,
        email: request.email,
        password_hash: hash_password(&request.password)?,
        display_name: request.display_name,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    db::users::insert(&state.db, &user).await?;

    let token = start_session(&state, user.id).await?;
    info!("Registered user {}", user.username);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session::session_cookie(&token, state.session_ttl_days))],
        Json(json!({ "success": true, "data": SafeUser::from(&user) })),
    ))
}

/// POST /api/auth/login
///
/// Accepts username or email in the `username` field. Unknown user and
/// wrong password produce the same response.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let user = match db::users::get_by_username(&state.db, &request.username).await? {
        Some(user) => Some(user),
        None => db::users::get_by_email(&state.db, &request.username).await?,
    };

    let Some(user) = user else {
        return Err(ApiError::Unauthorized("Invalid username or password".to_string()));
    };

    if !verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::Unauthorized("Invalid username or password".to_string()));
    }

    let token = start_session(&state, user.id).await?;

    Ok((
        [(header::SET_COOKIE, session::session_cookie(&token, state.session_ttl_days))],
        Json(json!({ "success": true, "data": SafeUser::from(&user) })),
    ))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> Result<impl IntoResponse, ApiError> {
    db::sessions::delete(&state.db, &auth.token).await?;

    Ok((
        [(header::SET_COOKIE, session::clear_session_cookie())],
        Json(json!({ "success": true, "message": "Logged out" })),
    ))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> Result<impl IntoResponse, ApiError> {
    let user = db::users::get_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    Ok(Json(json!({ "success": true, "data": SafeUser::from(&user) })))
}
