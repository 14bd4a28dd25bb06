//! Axum route handler for direct (non-chat) resume analysis.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::builtin::{run_analysis, ResumeAnalysis};
use super::ToolContext;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub focus: Option<String>,
}

/// POST /api/v1/resumes/:id/analyze
///
/// Same analysis the `analyze_resume` tool runs, invoked directly. The
/// report is persisted onto the resume row and returned.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ResumeAnalysis>, AppError> {
    state
        .store
        .get_resume(resume_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    let ctx = ToolContext {
        store: state.store.as_ref(),
        generator: state.generator.as_ref(),
        resume_id,
    };

    let analysis = run_analysis(&ctx, request.focus.as_deref())
        .await
        .map_err(|e| AppError::Llm(format!("Analysis failed: {e}")))?;

    Ok(Json(analysis))
}
