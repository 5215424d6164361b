use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::{
    auth::{self, TokenState},
    config::AppConfig,
    error::SessionExpired,
    flash,
    models::Notification,
};

/// Where a signed-in visitor lands when no usable `next` is given.
pub const DEFAULT_AFTER_SIGNIN: &str = "/dashboard";

pub fn is_protected(path: &str) -> bool {
    path == "/dashboard" || path.starts_with("/dashboard/")
}

fn is_auth_page(path: &str) -> bool {
    matches!(path, "/signin" | "/signup")
}

/// safe_next
///
/// Only site-local paths are honoured as a post-login destination. Anything
/// that could leave the site (`https://…`, `//host`, `/\host`) falls back to
/// the dashboard.
pub fn safe_next(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.starts_with("/\\")
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => DEFAULT_AFTER_SIGNIN.to_string(),
    }
}

/// The sign-in URL that returns to `path_and_query` afterwards.
pub fn signin_url(path_and_query: &str) -> String {
    format!(
        "/signin?next={}",
        utf8_percent_encode(path_and_query, NON_ALPHANUMERIC)
    )
}

fn append_cookie(response: &mut Response, cookie: String) {
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
}

/// route_guard
///
/// Wraps every route.
///
/// 1. `/dashboard*` without a live session redirects to `/signin?next=…`.
/// 2. `/signin` and `/signup` redirect a signed-in visitor to the dashboard.
/// 3. A stale (expired) session cookie is removed on the way out, as is the
///    cookie of any response marked [`SessionExpired`] by a handler.
pub async fn route_guard(
    State(config): State<AppConfig>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let stored = auth::read_cookie(request.headers(), &config.auth_cookie_name);
    let state = stored
        .as_deref()
        .map(|token| auth::inspect_token(token, auth::now_secs()));
    let signed_in = state == Some(TokenState::Live);
    let expired = state == Some(TokenState::Expired);

    if is_protected(&path) && !signed_in {
        let target = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or(path);
        tracing::debug!(target = %target, expired, "Redirecting anonymous visitor to sign-in");
        let mut response = Redirect::to(&signin_url(&target)).into_response();
        if expired {
            append_cookie(&mut response, auth::clear_cookie(&config.auth_cookie_name));
            append_cookie(
                &mut response,
                flash::cookie_for(&Notification::info(
                    "Your session has expired. Please sign in again.",
                )),
            );
        }
        return response;
    }

    if is_auth_page(&path) && signed_in {
        return Redirect::to(DEFAULT_AFTER_SIGNIN).into_response();
    }

    let mut response = next.run(request).await;

    if expired || response.extensions().get::<SessionExpired>().is_some() {
        tracing::info!("Clearing session cookie");
        append_cookie(&mut response, auth::clear_cookie(&config.auth_cookie_name));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_local_paths_are_valid_next_targets() {
        assert_eq!(safe_next(Some("/dashboard/blogs?page=2")), "/dashboard/blogs?page=2");
        assert_eq!(safe_next(Some("https://evil.example")), DEFAULT_AFTER_SIGNIN);
        assert_eq!(safe_next(Some("//evil.example")), DEFAULT_AFTER_SIGNIN);
        assert_eq!(safe_next(Some("/\\evil.example")), DEFAULT_AFTER_SIGNIN);
        assert_eq!(safe_next(Some("")), DEFAULT_AFTER_SIGNIN);
        assert_eq!(safe_next(None), DEFAULT_AFTER_SIGNIN);
    }

    #[test]
    fn protected_prefix_is_exact() {
        assert!(is_protected("/dashboard"));
        assert!(is_protected("/dashboard/blogs/1/edit"));
        assert!(!is_protected("/dashboards"));
        assert!(!is_protected("/blogs"));
    }

    #[test]
    fn signin_url_encodes_the_return_path() {
        assert_eq!(
            signin_url("/dashboard/blogs?page=2"),
            "/signin?next=%2Fdashboard%2Fblogs%3Fpage%3D2"
        );
    }
}
