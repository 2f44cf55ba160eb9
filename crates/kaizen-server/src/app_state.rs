// ABOUTME: Shared application state for the kaizen HTTP server.
// ABOUTME: Holds the request pipeline and the upload store, both built once at startup.

use std::sync::Arc;

use kaizen_agent::Pipeline;
use kaizen_store::UploadStore;

/// State accessible by all Axum handlers. Read-only after startup.
pub struct AppState {
    pub pipeline: Pipeline,
    pub uploads: UploadStore,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(pipeline: Pipeline, uploads: UploadStore) -> Self {
        Self { pipeline, uploads }
    }
}
