use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::generation::client::GenerationFailure;
use crate::llm_client::LlmError;
use crate::session::Phase;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required upstream data (resume, job description, prior analysis) is absent.
    #[error("Input missing: {0}")]
    InputMissing(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationFailure),

    #[error("Generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Free-edit failures are passed through as-is; the editor decides the wording.
    #[error("AI edit failed: {0}")]
    Edit(#[from] LlmError),

    #[error("Another request is already in progress")]
    Busy,

    #[error("Cannot {action} while on the {phase:?} page")]
    InvalidTransition { action: &'static str, phase: Phase },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Parser detail stays in the logs.
pub const UNREADABLE_FILE_MESSAGE: &str =
    "Could not read the file. Please upload a different PDF, DOCX, or TXT file.";

impl AppError {
    /// Text suitable for the session's error banner.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InputMissing(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::Extraction(ExtractionError::Unreadable(_)) => {
                UNREADABLE_FILE_MESSAGE.to_string()
            }
            AppError::Extraction(e) => e.to_string(),
            AppError::Generation(failure) => failure.user_message().to_string(),
            AppError::Timeout(_) => {
                "The AI took too long to respond. Please try again.".to_string()
            }
            AppError::Edit(e) => format!("The AI could not revise the document: {e}"),
            AppError::Busy => "Please wait for the current request to finish.".to_string(),
            AppError::InvalidTransition { .. } => self.to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::InputMissing(_) => (StatusCode::BAD_REQUEST, "INPUT_MISSING"),
            AppError::Extraction(ExtractionError::UnsupportedFormat(_)) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT")
            }
            AppError::Extraction(ExtractionError::EmptyExtraction) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_EXTRACTION")
            }
            AppError::Extraction(e) => {
                tracing::warn!("Extraction error: {e}");
                (StatusCode::UNPROCESSABLE_ENTITY, "UNREADABLE_FILE")
            }
            AppError::Generation(failure) => {
                tracing::error!(cause = failure.cause(), "Generation error: {failure}");
                (StatusCode::BAD_GATEWAY, "GENERATION_FAILURE")
            }
            AppError::Timeout(after) => {
                tracing::error!("Generation timed out after {after:?}");
                (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT")
            }
            AppError::Edit(e) => {
                tracing::error!("LLM edit error: {e}");
                (StatusCode::BAD_GATEWAY, "EDIT_FAILURE")
            }
            AppError::Busy => (StatusCode::CONFLICT, "BUSY"),
            AppError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.user_message()
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::client::GENERATION_RETRY_MESSAGE;

    #[test]
    fn test_generation_causes_collapse_to_one_message() {
        let missing = AppError::Generation(GenerationFailure::MissingStructure("revisedResume"));
        let backend = AppError::Generation(GenerationFailure::Backend(LlmError::EmptyContent));
        assert_eq!(missing.user_message(), GENERATION_RETRY_MESSAGE);
        assert_eq!(backend.user_message(), GENERATION_RETRY_MESSAGE);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Busy.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Timeout(Duration::from_secs(5)).into_response().status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::Extraction(ExtractionError::UnsupportedFormat("image/png".to_string()))
                .into_response()
                .status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            AppError::InputMissing("Resume is missing".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_unreadable_file_detail_is_not_exposed() {
        let err = AppError::Extraction(ExtractionError::Unreadable(
            "invalid Zip archive: Could not find central directory end".to_string(),
        ));
        assert_eq!(err.user_message(), UNREADABLE_FILE_MESSAGE);
        assert!(!err.user_message().contains("Zip"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let err = AppError::Internal(anyhow::anyhow!("secret connection string"));
        assert!(!err.user_message().contains("secret"));
    }
}
