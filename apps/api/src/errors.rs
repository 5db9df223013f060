use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::evaluation::reply::ReplyError;
use crate::extraction::ExtractionError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Document parse error: {0}")]
    DocumentParse(String),

    #[error("Response format error: {0}")]
    ResponseFormat(String),

    #[error("Percentage parse error: {0}")]
    PercentageParse(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedType(media_type) => AppError::Validation(format!(
                "Unsupported file type '{media_type}'. Please upload a PDF or DOCX resume."
            )),
            ExtractionError::Parse { .. } => AppError::DocumentParse(err.to_string()),
        }
    }
}

impl From<ReplyError> for AppError {
    fn from(err: ReplyError) -> Self {
        match err {
            ReplyError::MissingMatchField => AppError::ResponseFormat(err.to_string()),
            ReplyError::InvalidPercentage(_) => AppError::PercentageParse(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::DocumentParse(msg) => {
                tracing::warn!("Document parse error: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "DOCUMENT_PARSE_ERROR",
                    "The uploaded resume could not be read. Please check the file and try again."
                        .to_string(),
                )
            }
            AppError::ResponseFormat(msg) => {
                tracing::error!("Response format error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "RESPONSE_FORMAT_ERROR",
                    "The AI evaluation did not contain a match percentage".to_string(),
                )
            }
            AppError::PercentageParse(msg) => {
                tracing::error!("Percentage parse error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PERCENTAGE_PARSE_ERROR",
                    "The AI evaluation returned an unreadable match percentage".to_string(),
                )
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("Please upload your resume".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_oversized_upload_maps_to_payload_too_large() {
        let response = AppError::PayloadTooLarge("too big".into()).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_unsupported_type_becomes_validation() {
        let err: AppError = ExtractionError::UnsupportedType("image/png".into()).into();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("image/png")));
    }

    #[test]
    fn test_reply_errors_keep_their_kind() {
        let format: AppError = ReplyError::MissingMatchField.into();
        assert!(matches!(format, AppError::ResponseFormat(_)));

        let percentage: AppError = ReplyError::InvalidPercentage("high".into()).into();
        assert!(matches!(percentage, AppError::PercentageParse(msg) if msg.contains("high")));
    }

    #[test]
    fn test_model_failures_map_to_bad_gateway() {
        let response = AppError::ResponseFormat("no marker".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = AppError::Llm(LlmError::EmptyContent).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
