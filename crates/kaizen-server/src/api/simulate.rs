// ABOUTME: Handler for POST /simulate, estimating the business impact of proposed agents.
// ABOUTME: Missing `problems` or `agents` fields default to empty lists.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use kaizen_core::{SimulateRequest, SimulationResult};

use super::ApiError;
use crate::app_state::SharedState;

/// POST /simulate
pub async fn simulate_impact(
    State(state): State<SharedState>,
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Json<SimulationResult>, ApiError> {
    let Json(request) = payload?;
    let result = state.pipeline.simulate(&request).await?;
    Ok(Json(result))
}
