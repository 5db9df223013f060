//! Axum route handlers for the Evaluation API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::evaluation::evaluator::{evaluate, Evaluation, EvaluationRequest, UploadedResume};
use crate::extraction::resolve_media_type;
use crate::state::AppState;

const JOB_DESCRIPTION_FIELD: &str = "job_description";
const RESUME_FIELD: &str = "resume";

/// POST /api/v1/evaluations
///
/// Multipart form: `job_description` (text) and `resume` (file). The resume
/// field may repeat so that "more than one file" reaches validation instead of
/// being silently dropped.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Evaluation>, AppError> {
    let request = read_evaluation_form(multipart).await?;
    let evaluation = evaluate(request, &state.extractors, state.llm.as_ref()).await?;
    Ok(Json(evaluation))
}

async fn read_evaluation_form(mut multipart: Multipart) -> Result<EvaluationRequest, AppError> {
    let mut request = EvaluationRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            JOB_DESCRIPTION_FIELD => {
                request.job_description = field.text().await.map_err(malformed)?;
            }
            RESUME_FIELD => {
                let file_name = field.file_name().map(str::to_string);
                let declared = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(malformed)?;

                // Browsers send an empty, unnamed part when no file was picked
                if bytes.is_empty() && file_name.as_deref().map_or(true, str::is_empty) {
                    continue;
                }

                let media_type = resolve_media_type(declared.as_deref(), file_name.as_deref())
                    .or(declared)
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                request.resumes.push(UploadedResume {
                    file_name,
                    media_type,
                    bytes,
                });
            }
            _ => {
                // drain unknown fields
                field.bytes().await.map_err(malformed)?;
            }
        }
    }

    Ok(request)
}

fn malformed(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(
            "The uploaded resume is larger than the upload limit".to_string(),
        );
    }
    AppError::Validation(format!("Malformed upload: {}", err.body_text()))
}
