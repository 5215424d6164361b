use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::dangerous;
use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, error::AppError};

/// Claims
///
/// The subset of a backend JWT this site looks at. The backend owns signature
/// verification; here the token is only inspected so an expired session is
/// dropped before it reaches the dashboard.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Claims {
    /// Subject (sub): the backend user identifier, if present.
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiration Time (exp): seconds since the epoch.
    #[serde(default)]
    pub exp: Option<u64>,
}

/// TokenState
///
/// Result of inspecting a stored bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    /// A JWT with a future `exp`, or an opaque token.
    Live,
    /// A JWT whose `exp` has passed.
    Expired,
}

/// inspect_token
///
/// Opaque (non-JWT) tokens are accepted as live; only the backend can judge them.
pub fn inspect_token(token: &str, now_secs: u64) -> TokenState {
    if token.split('.').count() != 3 {
        return TokenState::Live;
    }

    // Only the payload is read, whatever the algorithm (HS*, RS*, ES*, EdDSA).
    match dangerous::insecure_decode::<Claims>(token) {
        Ok(data) => match data.claims.exp {
            Some(exp) if exp <= now_secs => TokenState::Expired,
            _ => TokenState::Live,
        },
        // Three dot-separated parts that are not a JWT are still an opaque token.
        Err(_) => TokenState::Live,
    }
}

pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// --- Cookie Handling ---

/// Returns the value of the named cookie from the `Cookie` request headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value storing the bearer token.
pub fn session_cookie(config: &AppConfig, token: &str) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.auth_cookie_name, token, config.session_max_age_secs
    );
    if config.secure_cookies() {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value removing a cookie.
pub fn clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Returns the stored token if the request carries a live session.
pub fn live_token(headers: &HeaderMap, config: &AppConfig) -> Option<String> {
    read_cookie(headers, &config.auth_cookie_name)
        .filter(|token| inspect_token(token, now_secs()) == TokenState::Live)
}

// --- Extractors ---

/// Session
///
/// The bearer token of the signed-in administrator. Any dashboard handler
/// takes this as an argument; a missing or expired cookie rejects with
/// `AppError::Unauthorized`, which logs the visitor out.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);
        live_token(&parts.headers, &config)
            .map(|token| Session { token })
            .ok_or(AppError::Unauthorized)
    }
}

/// MaybeSession
///
/// Optional session for public pages that only adjust their navigation.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl MaybeSession {
    pub fn is_signed_in(&self) -> bool {
        self.0.is_some()
    }
}

impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);
        Ok(MaybeSession(
            live_token(&parts.headers, &config).map(|token| Session { token }),
        ))
    }
}
