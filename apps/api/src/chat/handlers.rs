//! Axum route handlers for chat threads and turns.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::{orchestrator, persistence, transcript};
use crate::errors::AppError;
use crate::models::chat::{ChatMessageRow, ChatThreadRow};
use crate::state::AppState;
use crate::tools::ToolContext;

const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub user_id: Uuid,
    /// Omitted on the first turn; a new thread is created.
    pub thread_id: Option<Uuid>,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub thread_id: Uuid,
    /// Absent when the model produced neither text nor tool calls.
    pub entry: Option<transcript::TranscriptEntry>,
    /// Signals the client that server-side document state changed during
    /// this turn and any pending local autosave is stale.
    pub mutated: bool,
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub cursor: Option<Uuid>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesResponse {
    pub messages: Vec<ChatMessageRow>,
    pub has_more: bool,
    pub next_cursor: Option<Uuid>,
}

/// POST /api/v1/resumes/:id/chat
///
/// Runs one full agentic turn and persists both sides of it.
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    state
        .store
        .get_resume(resume_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    let thread = match request.thread_id {
        Some(thread_id) => {
            let thread = persistence::get_thread(&state.db, thread_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Thread {thread_id} not found")))?;
            if thread.resume_id != resume_id {
                return Err(AppError::Validation(
                    "thread does not belong to this resume".to_string(),
                ));
            }
            thread
        }
        None => {
            let title = persistence::thread_title(message, state.config.thread_title_max_chars);
            persistence::create_thread(&state.db, resume_id, request.user_id, &title).await?
        }
    };

    info!("Chat turn on resume {} thread {}", resume_id, thread.id);

    // History is read before the new user message is persisted, so the turn
    // never sees its own input twice.
    let history_rows =
        persistence::recent_messages(&state.db, thread.id, state.config.chat_history_messages)
            .await?;
    let history = history_messages(&history_rows);

    persistence::insert_entry(&state.db, thread.id, &transcript::user_entry(message)).await?;

    let ctx = ToolContext {
        store: state.store.as_ref(),
        generator: state.generator.as_ref(),
        resume_id,
    };
    let result = orchestrator::run_turn(
        &state.llm,
        &ctx,
        history,
        message,
        state.config.max_agent_steps,
    )
    .await?;

    let entry = transcript::build_transcript_entry("assistant", &result.steps);
    if let Some(entry) = &entry {
        persistence::insert_entry(&state.db, thread.id, entry).await?;
    }

    Ok(Json(ChatResponse {
        thread_id: thread.id,
        entry,
        mutated: result.mutated,
    }))
}

/// GET /api/v1/resumes/:id/threads
pub async fn handle_list_threads(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<Vec<ChatThreadRow>>, AppError> {
    state
        .store
        .get_resume(resume_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    let threads = persistence::list_threads(&state.db, resume_id).await?;
    Ok(Json(threads))
}

/// GET /api/v1/threads/:id/messages
///
/// Cursor-paginated history: pass `nextCursor` from the previous response to
/// walk backward toward the start of the thread.
pub async fn handle_get_messages(
    State(state): State<AppState>,
    Path(thread_id): Path<Uuid>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<MessagesResponse>, AppError> {
    persistence::get_thread(&state.db, thread_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Thread {thread_id} not found")))?;

    let limit = query
        .limit
        .unwrap_or(state.config.chat_history_messages)
        .clamp(1, MAX_PAGE_SIZE);

    let page = persistence::page_messages(&state.db, thread_id, query.cursor, limit)
        .await
        .map_err(page_error)?;

    Ok(Json(MessagesResponse {
        messages: page.messages,
        has_more: page.has_more,
        next_cursor: page.next_cursor,
    }))
}

/// DELETE /api/v1/threads/:id
pub async fn handle_delete_thread(
    State(state): State<AppState>,
    Path(thread_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = persistence::delete_thread(&state.db, thread_id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Thread {thread_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// A bad cursor is the caller's mistake (400); a storage failure behind the
/// same call keeps the sanitized 500 envelope.
fn page_error(e: persistence::PageError) -> AppError {
    match e {
        persistence::PageError::UnknownCursor(cursor) => {
            AppError::Validation(format!("cursor {cursor} does not exist in this thread"))
        }
        persistence::PageError::Storage(e) => AppError::Internal(e),
    }
}

/// Converts stored rows to Messages API history. Only narrative text goes
/// back to the model; tool parts were already seen as tool_results in their
/// own turn, and rows with no text at all (tool-only turns) are skipped
/// because the API rejects empty content.
fn history_messages(rows: &[ChatMessageRow]) -> Vec<Value> {
    rows.iter()
        .filter(|row| !row.text.trim().is_empty())
        .map(|row| json!({"role": row.role, "content": row.text}))
        .collect()
}
