// ABOUTME: Route definitions for the kaizen HTTP API.
// ABOUTME: Assembles all endpoints into one Axum Router with permissive CORS and request tracing.

use axum::Json;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;

/// Build the complete Axum router with all routes and shared state.
pub fn create_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/analyze", post(api::analyze::analyze_company))
        .route("/generate-agents", post(api::agents::generate_agents))
        .route("/simulate", post(api::simulate::simulate_impact))
        .route(
            "/upload",
            post(api::upload::upload_files)
                .layer(DefaultBodyLimit::max(api::upload::UPLOAD_BODY_LIMIT)),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Service banner listing the main endpoints.
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Kaizen AI API",
        "version": "1.0",
        "endpoints": ["/analyze", "/generate-agents", "/simulate", "/upload"]
    }))
}

/// Health check handler. Returns 200 OK with a simple JSON body.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
