use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    /// BCP-47 language tag of the resume content, e.g. "en" or "de".
    pub language: String,
    /// Latest AI analysis report, if one has been run.
    pub analysis: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct SectionRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub title: String,
    /// Section kind: experience | education | projects | certifications |
    /// languages | summary | custom | skills. Drives default content shape.
    pub kind: String,
    /// Free-shape JSON content; the shape depends on `kind`.
    pub content: Value,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a caller may patch on a resume row. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct ResumePatch {
    pub language: Option<String>,
    pub analysis: Option<Value>,
}

/// A section to be inserted. `sort_order` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewSection {
    pub title: String,
    pub kind: String,
    pub content: Value,
}
