use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::views;

/// Errors from the backend REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend rejected the bearer token.
    #[error("backend rejected the session")]
    Unauthorized,

    /// The requested resource does not exist.
    #[error("not found")]
    NotFound,

    /// Any other non-2xx answer.
    #[error("backend error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Backend-provided message, or the raw body.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("unexpected backend response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message suitable for an inline banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => "The content service is unreachable. Please try again.".to_string(),
            ApiError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            ApiError::NotFound => "The requested item could not be found.".to_string(),
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Decode(_) => "The content service returned an unexpected response.".to_string(),
        }
    }
}

/// Application-level error type for handlers.
///
/// Implements [`IntoResponse`]: an expired session becomes a forced logout,
/// everything else renders an error page with a banner.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No usable session for a protected page.
    #[error("unauthorized")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid input: {0}")]
    Validation(String),

    /// A request body over the dashboard upload limit.
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Response marker for a forced logout. The route guard sees it and clears
/// the session cookie, since only the guard knows the configured cookie name.
#[derive(Debug, Clone, Copy)]
pub struct SessionExpired;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized | AppError::Api(ApiError::Unauthorized) => {
                return forced_logout();
            }
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            AppError::Api(ApiError::NotFound) => (
                StatusCode::NOT_FOUND,
                ApiError::NotFound.user_message(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::PayloadTooLarge { limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!(
                    "The upload is too large (limit {} MiB). Please choose a smaller file.",
                    limit / (1024 * 1024)
                ),
            ),
            AppError::Api(err) => {
                tracing::warn!(error = %err, "Backend call failed");
                (StatusCode::BAD_GATEWAY, err.user_message())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Html(views::layout::error_page(status, &message))).into_response()
    }
}

/// A 401 anywhere logs the visitor out: they land on the sign-in page with a
/// toast, and the guard clears the cookie on the way out.
fn forced_logout() -> Response {
    let flash = crate::flash::cookie_for(&crate::models::Notification::info(
        "Your session has expired. Please sign in again.",
    ));
    let mut response = Redirect::to("/signin").into_response();
    if let Ok(value) = flash.parse() {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response.extensions_mut().insert(SessionExpired);
    response
}
