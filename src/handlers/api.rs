use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    AppState,
    error::ApiError,
    models::{ListQuery, Project},
    search::{PageSlice, ProjectSearch},
};

/// ErrorBody
///
/// JSON error returned by the search endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// search_projects
///
/// [Public Route] Filters and pages the project catalogue with the same rules
/// as the `/projects` page, returning JSON for client-side widgets.
#[utoipa::path(
    get,
    path = "/api/search/projects",
    params(ProjectSearch),
    responses(
        (status = 200, description = "One page of matching projects", body = PageSlice<Project>),
        (status = 502, description = "Backend unavailable", body = ErrorBody)
    ),
    tag = "search"
)]
pub async fn search_projects(
    State(state): State<AppState>,
    Query(search): Query<ProjectSearch>,
) -> Result<Json<PageSlice<Project>>, (StatusCode, Json<ErrorBody>)> {
    let projects = state
        .api
        .all_projects(&ListQuery::default())
        .await
        .map_err(|err: ApiError| {
            tracing::warn!(error = %err, "Project search failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorBody {
                    error: err.user_message(),
                }),
            )
        })?;
    Ok(Json(search.paginate(search.filter(projects))))
}

/// health
///
/// Liveness check for load balancers. Does not touch the backend.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is running", body = String)),
    tag = "health"
)]
pub async fn health() -> &'static str {
    "ok"
}
