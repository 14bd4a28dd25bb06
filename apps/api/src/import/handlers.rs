//! Axum route handler for resume import.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::prompts::{IMPORT_PROMPT_TEMPLATE, IMPORT_SYSTEM};
use super::{normalize_import, ImportedResume};
use crate::errors::AppError;
use crate::models::resume::{ResumeRow, SectionRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub user_id: Uuid,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub resume: ResumeRow,
    pub sections: Vec<SectionRow>,
}

/// POST /api/v1/resumes/import
///
/// Structures pasted resume text with the model and persists the result.
pub async fn handle_import(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<(StatusCode, Json<ImportResponse>), AppError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "resume text cannot be empty".to_string(),
        ));
    }

    let prompt = IMPORT_PROMPT_TEMPLATE.replace("{resume_text}", text);
    let raw = state
        .generator
        .generate(IMPORT_SYSTEM, &prompt)
        .await
        .map_err(|e| {
            if e.is_auth() {
                AppError::Unauthorized(e.to_string())
            } else {
                AppError::Llm(format!("Import structuring failed: {e}"))
            }
        })?;

    let value: Value = crate::extraction::extract(&raw)?;
    let imported: ImportedResume = serde_json::from_value(normalize_import(value))
        .map_err(|e| AppError::Llm(format!("Imported structure did not decode: {e}")))?;

    let title = imported
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "Imported resume".to_string());
    let language = imported
        .language
        .clone()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| "en".to_string());

    let resume = insert_resume(&state, request.user_id, &title, &language).await?;

    let mut sections = Vec::with_capacity(imported.sections.len());
    for section in imported.sections {
        let inserted = state
            .store
            .insert_section(resume.id, section.into_new_section())
            .await
            .map_err(AppError::Internal)?;
        sections.push(inserted);
    }

    info!(
        "Imported resume {} with {} sections for user {}",
        resume.id,
        sections.len(),
        request.user_id
    );

    Ok((StatusCode::CREATED, Json(ImportResponse { resume, sections })))
}

async fn insert_resume(
    state: &AppState,
    user_id: Uuid,
    title: &str,
    language: &str,
) -> Result<ResumeRow, AppError> {
    let resume = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, user_id, title, language, analysis, created_at, updated_at)
        VALUES ($1, $2, $3, $4, NULL, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(title)
    .bind(language)
    .fetch_one(&state.db)
    .await?;

    Ok(resume)
}
