//! Session-cookie authentication middleware
//!
//! Sessions are rows in the `sessions` table keyed by a random token carried
//! in an HttpOnly cookie. The middleware resolves the cookie to its user and
//! attaches an [`AuthSession`] extension for downstream handlers.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use rand::RngCore;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::{db, AppState};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "brewlog_session";

/// Authenticated caller attached to the request by the middleware
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    /// Session token, needed by logout to remove the row
    pub token: String,
}

/// Require a valid session cookie; 401 otherwise
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = cookie_value(request.headers(), SESSION_COOKIE)
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    let user = db::sessions::lookup(&state.db, &token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    request.extensions_mut().insert(AuthSession {
        user_id: user.id,
        username: user.username,
        email: user.email,
        display_name: user.display_name,
        token,
    });
    Ok(next.run(request).await)
}

/// Generate a fresh 256-bit session token, hex encoded
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Build the Set-Cookie value that establishes a session
pub fn session_cookie(token: &str, ttl_days: i64) -> String {
    let max_age = ttl_days * 24 * 60 * 60;
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}")
}

/// Build the Set-Cookie value that clears the session cookie
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extract a cookie value from the Cookie header, if present
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_value_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; brewlog_session=abc123; lang=en"),
        );
        assert_eq!(
            cookie_value(&headers, SESSION_COOKIE),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn cookie_value_missing_header_is_none() {
        let headers = HeaderMap::new();
        assert_eq!(cookie_value(&headers, SESSION_COOKIE), None);
    }

    #[test]
    fn generated_tokens_are_unique_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
