//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/` except `/health`.
//! Middleware: CORS, request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/ask", post(handlers::ask::ask))
        // Jurisdictions
        .route("/states", get(handlers::states::list_states))
        .route("/states/{code}/search", get(handlers::states::search))
        .route("/states/{code}/similar", get(handlers::states::similar))
        .route("/states/{code}/steps", get(handlers::states::steps))
        .route("/states/{code}/categories", get(handlers::states::categories))
        .route("/states/{code}/resources", get(handlers::states::resources))
        // Sessions
        .route("/sessions/{id}/history", get(handlers::session::get_history))
        .route("/sessions/{id}", axum::routing::delete(handlers::session::delete_session));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<serde_json::Value> {
    let navigator = &state.navigator;
    let metrics = state.metrics.snapshot();
    axum::Json(serde_json::json!({
        "status": metrics.status,
        "version": env!("CARGO_PKG_VERSION"),
        "jurisdictions": navigator.registry().len(),
        "provider": navigator.provider_type().map(|p| p.to_string()),
        "provider_unavailable": navigator.provider_unavailable(),
        "sessions": state.sessions.len(),
        "metrics": metrics,
    }))
}
