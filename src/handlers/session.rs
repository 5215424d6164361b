//! Sign-in, sign-up and sign-out.

use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use super::{PageContext, append_cookie, form_status, redirect_with};
use crate::{
    AppState, auth,
    error::ApiError,
    guard::{DEFAULT_AFTER_SIGNIN, safe_next},
    models::{AuthResponse, Credentials, Notification, SignupForm},
    views::{self, layout::Nav},
};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// SigninForm
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SigninForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

/// Checks a new password and its confirmation.
pub fn check_new_password(password: &str, confirm: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!("Passwords must be at least {MIN_PASSWORD_LEN} characters."));
    }
    if password != confirm {
        return Err("Passwords do not match.".to_string());
    }
    Ok(())
}

/// Stores the token and sends the visitor on.
fn signed_in(state: &AppState, granted: AuthResponse, to: &str, greeting: String) -> Response {
    let mut response = redirect_with(to, Notification::success(greeting));
    append_cookie(&mut response, &auth::session_cookie(&state.config, &granted.token));
    response
}

pub async fn signin_page(ctx: PageContext, Query(query): Query<NextQuery>) -> Response {
    let body = views::auth::signin("", query.next.as_deref(), None);
    ctx.site("Sign in", body)
}

/// signin
///
/// [Public Route] Exchanges credentials for a backend token, stores it in the
/// session cookie and continues to the local `next` path (or the dashboard).
pub async fn signin(
    ctx: PageContext,
    State(state): State<AppState>,
    Form(form): Form<SigninForm>,
) -> Response {
    let username = form.username.trim().to_string();
    let next = form.next.as_deref();
    let rerender = |ctx: PageContext, status: StatusCode, message: &str| {
        let body = views::auth::signin(&username, next, Some(message));
        ctx.render(status, "Sign in", Nav::Site, body)
    };

    if username.is_empty() || form.password.is_empty() {
        return rerender(
            ctx,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Username and password are required.",
        );
    }

    let credentials = Credentials {
        username: username.clone(),
        password: form.password,
    };
    match state.api.login(&credentials).await {
        Ok(granted) if !granted.token.is_empty() => {
            tracing::info!(user = %username, "Signed in");
            let greeting = format!("Welcome back, {username}!");
            signed_in(&state, granted, &safe_next(next), greeting)
        }
        Ok(_) => {
            tracing::warn!("Backend login returned an empty token");
            let err = ApiError::Decode("empty token".to_string());
            rerender(ctx, StatusCode::BAD_GATEWAY, &err.user_message())
        }
        Err(ApiError::Unauthorized) => {
            tracing::info!(user = %username, "Rejected sign-in");
            rerender(ctx, StatusCode::UNAUTHORIZED, "Invalid username or password.")
        }
        Err(err) => {
            tracing::warn!(error = %err, "Sign-in failed");
            rerender(ctx, form_status(&err), &err.user_message())
        }
    }
}

pub async fn signup_page(ctx: PageContext) -> Response {
    ctx.site("Sign up", views::auth::signup("", "", None))
}

/// signup
///
/// [Public Route] Creates the account on the backend and signs the new user
/// straight in. The confirmation field is checked here and never forwarded.
pub async fn signup(
    ctx: PageContext,
    State(state): State<AppState>,
    Form(mut form): Form<SignupForm>,
) -> Response {
    form.username = form.username.trim().to_string();
    form.email = form.email.trim().to_string();

    let check = if form.username.is_empty() {
        Err("Username is required.".to_string())
    } else if !form.email.is_empty() && !crate::contact::looks_like_email(&form.email) {
        Err("Email address is not valid.".to_string())
    } else {
        check_new_password(&form.password, &form.confirm_password)
    };
    if let Err(message) = check {
        let body = views::auth::signup(&form.username, &form.email, Some(&message));
        return ctx.render(StatusCode::UNPROCESSABLE_ENTITY, "Sign up", Nav::Site, body);
    }

    match state.api.signup(&form).await {
        Ok(granted) if !granted.token.is_empty() => {
            tracing::info!(user = %form.username, "Account created");
            let greeting = format!("Welcome, {}!", form.username);
            signed_in(&state, granted, DEFAULT_AFTER_SIGNIN, greeting)
        }
        Ok(_) => redirect_with(
            "/signin",
            Notification::success("Account created. Please sign in."),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "Sign-up failed");
            let body = views::auth::signup(&form.username, &form.email, Some(&err.user_message()));
            ctx.render(form_status(&err), "Sign up", Nav::Site, body)
        }
    }
}

/// logout
///
/// Clears the session cookie. The backend token is stateless, so there is
/// nothing to revoke remotely.
pub async fn logout(State(state): State<AppState>) -> Response {
    let mut response = redirect_with("/signin", Notification::info("You have been signed out."));
    append_cookie(&mut response, &auth::clear_cookie(&state.config.auth_cookie_name));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_passwords_need_length_and_confirmation() {
        assert!(check_new_password("short", "short").is_err());
        assert_eq!(
            check_new_password("long enough", "long enougH"),
            Err("Passwords do not match.".to_string())
        );
        assert!(check_new_password("long enough", "long enough").is_ok());
    }
}
