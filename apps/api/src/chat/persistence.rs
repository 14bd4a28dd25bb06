//! Thread and message storage, including cursor pagination.
//!
//! Messages page newest-first from the database but are returned
//! oldest-first per page for display. The cursor is the id of the oldest
//! message of the previous page; the next page is everything strictly older
//! than that message by `(created_at, id)`, so the ordering stays total even
//! when two messages share a timestamp.

use anyhow::{Context, Result};
use serde_json::Value;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::transcript::TranscriptEntry;
use crate::models::chat::{ChatMessageRow, ChatThreadRow};

/// One page of a thread's history, oldest-first.
pub struct MessagePage {
    pub messages: Vec<ChatMessageRow>,
    pub has_more: bool,
    pub next_cursor: Option<Uuid>,
}

/// Why a page request failed. An unknown cursor is the caller's mistake;
/// everything else is storage trouble and must not surface as a client error.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("cursor {0} does not exist in this thread")]
    UnknownCursor(Uuid),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Derives a thread title from its opening message: first `max_chars`
/// characters, whitespace-trimmed. Set once at creation, never updated.
pub fn thread_title(first_message: &str, max_chars: usize) -> String {
    first_message.trim().chars().take(max_chars).collect()
}

pub async fn create_thread(
    pool: &PgPool,
    resume_id: Uuid,
    user_id: Uuid,
    title: &str,
) -> Result<ChatThreadRow> {
    sqlx::query_as::<_, ChatThreadRow>(
        r#"
        INSERT INTO chat_threads (id, resume_id, user_id, title, created_at)
        VALUES ($1, $2, $3, $4, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(resume_id)
    .bind(user_id)
    .bind(title)
    .fetch_one(pool)
    .await
    .context("Failed to create chat thread")
}

pub async fn get_thread(pool: &PgPool, thread_id: Uuid) -> Result<Option<ChatThreadRow>> {
    sqlx::query_as::<_, ChatThreadRow>("SELECT * FROM chat_threads WHERE id = $1")
        .bind(thread_id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch chat thread")
}

/// All threads of one resume, newest first.
pub async fn list_threads(pool: &PgPool, resume_id: Uuid) -> Result<Vec<ChatThreadRow>> {
    sqlx::query_as::<_, ChatThreadRow>(
        "SELECT * FROM chat_threads WHERE resume_id = $1 ORDER BY created_at DESC",
    )
    .bind(resume_id)
    .fetch_all(pool)
    .await
    .context("Failed to list chat threads")
}

/// Deletes a thread and its messages. Returns false when the thread did not
/// exist.
pub async fn delete_thread(pool: &PgPool, thread_id: Uuid) -> Result<bool> {
    sqlx::query("DELETE FROM chat_messages WHERE thread_id = $1")
        .bind(thread_id)
        .execute(pool)
        .await
        .context("Failed to delete chat messages")?;

    let result = sqlx::query("DELETE FROM chat_threads WHERE id = $1")
        .bind(thread_id)
        .execute(pool)
        .await
        .context("Failed to delete chat thread")?;

    Ok(result.rows_affected() > 0)
}

/// Persists one transcript entry as a message row.
pub async fn insert_entry(
    pool: &PgPool,
    thread_id: Uuid,
    entry: &TranscriptEntry,
) -> Result<ChatMessageRow> {
    let parts: Value =
        serde_json::to_value(&entry.parts).context("Failed to serialize message parts")?;

    sqlx::query_as::<_, ChatMessageRow>(
        r#"
        INSERT INTO chat_messages (id, thread_id, role, text, parts, created_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(thread_id)
    .bind(&entry.role)
    .bind(&entry.text)
    .bind(parts)
    .fetch_one(pool)
    .await
    .context("Failed to insert chat message")
}

/// The most recent `limit` messages of a thread, oldest-first, for model
/// context assembly.
pub async fn recent_messages(
    pool: &PgPool,
    thread_id: Uuid,
    limit: i64,
) -> Result<Vec<ChatMessageRow>> {
    let mut rows = sqlx::query_as::<_, ChatMessageRow>(
        r#"
        SELECT * FROM chat_messages
        WHERE thread_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(thread_id)
    .bind(limit)
    .fetch_all(pool)
    .await
    .context("Failed to fetch recent chat messages")?;

    rows.reverse();
    Ok(rows)
}

/// One page of messages, walking backward through history from `cursor`
/// (exclusive), or from the newest message when no cursor is given.
pub async fn page_messages(
    pool: &PgPool,
    thread_id: Uuid,
    cursor: Option<Uuid>,
    limit: i64,
) -> Result<MessagePage, PageError> {
    // Over-fetch by one row to learn whether an older page exists.
    let mut rows = match cursor {
        Some(cursor_id) => {
            let anchor = sqlx::query_as::<_, ChatMessageRow>(
                "SELECT * FROM chat_messages WHERE id = $1 AND thread_id = $2",
            )
            .bind(cursor_id)
            .bind(thread_id)
            .fetch_optional(pool)
            .await
            .context("Failed to resolve pagination cursor")?
            .ok_or(PageError::UnknownCursor(cursor_id))?;

            sqlx::query_as::<_, ChatMessageRow>(
                r#"
                SELECT * FROM chat_messages
                WHERE thread_id = $1
                  AND (created_at < $2 OR (created_at = $2 AND id < $3))
                ORDER BY created_at DESC, id DESC
                LIMIT $4
                "#,
            )
            .bind(thread_id)
            .bind(anchor.created_at)
            .bind(anchor.id)
            .bind(limit + 1)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, ChatMessageRow>(
                r#"
                SELECT * FROM chat_messages
                WHERE thread_id = $1
                ORDER BY created_at DESC, id DESC
                LIMIT $2
                "#,
            )
            .bind(thread_id)
            .bind(limit + 1)
            .fetch_all(pool)
            .await
        }
    }
    .context("Failed to page chat messages")?;

    let has_more = rows.len() as i64 > limit;
    rows.truncate(limit as usize);

    // Last row in DESC order is the oldest of the page; it anchors the next
    // request.
    let next_cursor = if has_more {
        rows.last().map(|row| row.id)
    } else {
        None
    };

    rows.reverse();
    Ok(MessagePage {
        messages: rows,
        has_more,
        next_cursor,
    })
}
