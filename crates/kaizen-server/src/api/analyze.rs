// ABOUTME: Handler for POST /analyze, turning a company description into operational problems.
// ABOUTME: Accepts optional uploaded-file excerpts and returns an AnalysisResult.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use kaizen_core::{AnalysisResult, AnalyzeRequest};

use super::ApiError;
use crate::app_state::SharedState;

/// POST /analyze
pub async fn analyze_company(
    State(state): State<SharedState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(request) = payload?;
    let result = state.pipeline.analyze(&request).await?;
    Ok(Json(result))
}
