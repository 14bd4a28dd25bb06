use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatThreadRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub user_id: Uuid,
    /// Set once from the first user message, never changed afterward.
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatMessageRow {
    pub id: Uuid,
    pub thread_id: Uuid,
    /// "user" | "assistant"
    pub role: String,
    /// Concatenated narrative text of the turn.
    pub text: String,
    /// Serialized ordered parts array — the exact text/tool interleaving the
    /// model produced. See `chat::transcript::MessagePart`.
    pub parts: Value,
    pub created_at: DateTime<Utc>,
}
