use axum::{
    Router,
    extract::FromRef,
    http::{HeaderName, header},
    middleware,
    response::IntoResponse,
    routing::get,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Backend access and the data it returns.
pub mod api;
pub mod models;

// Session handling and route protection.
pub mod auth;
pub mod guard;

// Site logic independent of HTTP.
pub mod contact;
pub mod flash;
pub mod markdown;
pub mod search;

pub mod config;
pub mod error;
pub mod handlers;
pub mod views;

// Module for routing segregation (Public, Auth, Dashboard).
pub mod routes;
use routes::{auth as auth_routes, dashboard, public};

// --- Public Re-exports ---

pub use api::{ApiState, HttpPortfolioApi, MockPortfolioApi, PortfolioApi};
pub use config::AppConfig;
pub use error::{ApiError, AppError};

/// ApiDoc
///
/// OpenAPI document for the JSON surface of the site. The HTML pages are not
/// part of it. Served at `/api-docs/openapi.json`, browsable at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::api::search_projects, handlers::api::health),
    components(schemas(models::Project, models::ProjectCategory, handlers::api::ErrorBody)),
    tags(
        (name = "search", description = "Project search"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// Implements the **Unified State Pattern**: one immutable, cheaply cloned
/// container shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// Backend access, either the REST client or the in-memory sample data.
    pub api: ApiState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

impl AppState {
    pub fn new(api: ApiState, config: AppConfig) -> Self {
        Self { api, config }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for ApiState {
    fn from_ref(app_state: &AppState) -> ApiState {
        app_state.api.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// Stylesheet compiled into the binary, so a deploy is a single file.
async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        include_str!("../static/site.css"),
    )
}

async fn not_found() -> AppError {
    AppError::NotFound("Page".to_string())
}

/// create_router
///
/// Assembles the routing structure, applies the route guard and the
/// observability layers, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/static/site.css", get(stylesheet))
        .merge(public::public_routes())
        .merge(auth_routes::auth_routes())
        // Dashboard Routes: nested under '/dashboard'. The guard below turns
        // anonymous visitors away before any handler runs.
        .nest("/dashboard", dashboard::dashboard_routes())
        .fallback(not_found)
        // Route guard: session checks, sign-in redirects, stale cookie cleanup.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::route_guard,
        ))
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a UUID for every incoming request.
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                // 3b. Request Tracing: one span per request, carrying the request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: echo x-request-id on the response.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Used by `TraceLayer` to open the request span. Includes the `x-request-id`
/// header so every log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
