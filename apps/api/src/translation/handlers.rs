//! Axum route handler for the streaming translation endpoint.

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::Response,
    Json,
};
use futures::StreamExt;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{ndjson, translate_sections_stream};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub language: String,
}

/// POST /api/v1/resumes/:id/translate
///
/// Streams NDJSON: one `progress` line per section, then one `done` line.
/// Aborting the connection stops the batch at the next await point.
pub async fn handle_translate(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<TranslateRequest>,
) -> Result<Response, AppError> {
    let language = request.language.trim().to_string();
    if language.is_empty() {
        return Err(AppError::Validation("language cannot be empty".to_string()));
    }

    state
        .store
        .get_resume(resume_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    let sections = state
        .store
        .list_sections(resume_id)
        .await
        .map_err(AppError::Internal)?;

    info!(
        "Streaming translation of {} sections of resume {} to '{}'",
        sections.len(),
        resume_id,
        language
    );

    let stream = translate_sections_stream(
        state.store.clone(),
        state.generator.clone(),
        resume_id,
        language,
        sections,
    )
    .map(|event| ndjson::event_line(&event));

    Response::builder()
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {e}")))
}
