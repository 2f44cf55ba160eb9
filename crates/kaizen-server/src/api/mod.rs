// ABOUTME: API module containing the HTTP handlers for the kaizen endpoints.
// ABOUTME: Also maps pipeline, upload, and extractor failures onto `{detail}` error responses.

pub mod agents;
pub mod analyze;
pub mod simulate;
pub mod upload;

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use kaizen_core::PipelineError;
use kaizen_store::UploadError;
use serde::Serialize;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// An error that renders as `{status} {"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

/// Every pipeline failure is a 500 carrying the error's message.
impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::InvalidFilename(_) => Self {
                status: StatusCode::BAD_REQUEST,
                detail: err.to_string(),
            },
            UploadError::Io(_) => Self::internal(format!("Failed to store upload: {}", err)),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self {
            status: err.status(),
            detail: err.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaizen_core::ProviderError;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn pipeline_errors_are_500_with_detail() {
        let cases = [
            (PipelineError::Configuration, "No LLM API key configured"),
            (
                PipelineError::MalformedResponse("expected value at line 1".to_string()),
                "Failed to parse LLM response: expected value at line 1",
            ),
            (
                PipelineError::provider(
                    "anthropic",
                    ProviderError::RateLimited("Your credit balance is too low".to_string()),
                ),
                "anthropic API error: rate limited: Your credit balance is too low",
            ),
        ];

        for (err, detail) in cases {
            let (status, json) = render(err.into()).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(json, serde_json::json!({ "detail": detail }));
        }
    }

    #[tokio::test]
    async fn invalid_filename_is_bad_request() {
        let (status, json) = render(UploadError::InvalidFilename("..".to_string()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["detail"].as_str().unwrap().contains("invalid file name"));
    }
}
