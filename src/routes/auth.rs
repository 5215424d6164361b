use crate::{AppState, handlers::session};
use axum::{
    Router,
    routing::{get, post},
};

/// Auth Router Module
///
/// The guard sends a visitor who is already signed in from `/signin` and
/// `/signup` straight to the dashboard.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        // GET|POST /signin?next=/dashboard/...
        // `next` is honoured only when it is a local path.
        .route("/signin", get(session::signin_page).post(session::signin))
        .route("/signup", get(session::signup_page).post(session::signup))
        // POST /logout
        // Clears the session cookie and returns to the sign-in page.
        .route("/logout", post(session::logout))
}
