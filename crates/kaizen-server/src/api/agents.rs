// ABOUTME: Handler for POST /generate-agents, designing one AI agent per analyzed problem.
// ABOUTME: Takes the AnalysisResult returned by /analyze as its body.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use kaizen_core::{AgentGenerationResult, AnalysisResult};

use super::ApiError;
use crate::app_state::SharedState;

/// POST /generate-agents
pub async fn generate_agents(
    State(state): State<SharedState>,
    payload: Result<Json<AnalysisResult>, JsonRejection>,
) -> Result<Json<AgentGenerationResult>, ApiError> {
    let Json(analysis) = payload?;
    let result = state.pipeline.generate_agents(&analysis).await?;
    Ok(Json(result))
}
