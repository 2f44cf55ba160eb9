// ABOUTME: HTTP server for kaizen, exposing the analysis, agent, simulation, and upload endpoints.
// ABOUTME: Uses Axum with an injected Pipeline and UploadStore shared across handlers.

pub mod api;
pub mod app_state;
pub mod config;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use config::{ConfigError, KaizenConfig};
pub use routes::create_router;
