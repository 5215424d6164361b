use crate::{AppState, handlers::dashboard};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Largest accepted dashboard request body (uploads included).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Dashboard Router Module
///
/// Content management for the signed-in administrator, nested under
/// `/dashboard`. Every mutation is a POST from an HTML form; create and edit
/// forms are `multipart/form-data` and are forwarded to the backend as such.
///
/// Deletes follow the confirm pattern: `GET .../delete` shows the
/// confirmation page, `POST .../delete` performs it.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::overview))
        // --- Blogs ---
        .route("/blogs", get(dashboard::blogs))
        .route(
            "/blogs/new",
            get(dashboard::blog_new).post(dashboard::blog_create),
        )
        .route(
            "/blogs/{id}/edit",
            get(dashboard::blog_edit).post(dashboard::blog_update),
        )
        .route(
            "/blogs/{id}/delete",
            get(dashboard::blog_confirm_delete).post(dashboard::blog_delete),
        )
        // --- Projects ---
        .route("/projects", get(dashboard::projects))
        .route(
            "/projects/new",
            get(dashboard::project_new).post(dashboard::project_create),
        )
        .route(
            "/projects/{id}/edit",
            get(dashboard::project_edit).post(dashboard::project_update),
        )
        .route(
            "/projects/{id}/delete",
            get(dashboard::project_confirm_delete).post(dashboard::project_delete),
        )
        // --- Messages ---
        .route("/messages", get(dashboard::messages))
        .route("/messages/{id}/read", post(dashboard::message_read))
        .route(
            "/messages/{id}/delete",
            get(dashboard::message_confirm_delete).post(dashboard::message_delete),
        )
        // --- Settings ---
        .route(
            "/settings",
            get(dashboard::settings).post(dashboard::settings_update),
        )
        .route("/settings/password", post(dashboard::change_password))
        // --- CV Showcase ---
        .route("/cv", get(dashboard::cv).post(dashboard::cv_save))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
