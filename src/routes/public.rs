use crate::{
    AppState,
    handlers::{api, contact, site},
};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Pages anyone can see. Read-only apart from the contact wizard, whose final
/// step forwards a message to the backend.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness check; answers without calling the backend.
        .route("/health", get(api::health))
        .route("/", get(site::home))
        .route("/about", get(site::about))
        // GET /projects?query=...&category=...&technology=...&page=...
        // Filtered, paged project listing.
        .route("/projects", get(site::projects))
        .route("/projects/{id}", get(site::project_detail))
        // GET /blogs?search=...&tag=...&page=...
        // Published posts only; drafts 404 for anonymous visitors.
        .route("/blogs", get(site::blogs))
        .route("/blogs/{id}", get(site::blog_detail))
        .route("/cv", get(site::cv))
        // GET|POST /contact
        // Three-step wizard; state travels in hidden fields.
        .route("/contact", get(contact::show).post(contact::submit))
        // GET /api/search/projects
        // JSON form of the project listing, documented in Swagger UI.
        .route("/api/search/projects", get(api::search_projects))
}
