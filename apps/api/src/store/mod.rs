//! Document store — the narrow persistence interface the tool executor and
//! translation pipeline mutate resumes through.
//!
//! Tools re-read through this trait on every invocation so each one observes
//! the effect of prior tools in the same agentic turn. `AppState` holds an
//! `Arc<dyn DocumentStore>`; production uses `PgStore`, tests an in-memory
//! store.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::models::resume::{NewSection, ResumePatch, ResumeRow, SectionRow};

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRow>>;

    /// Patches resume-level fields. `None` fields are left unchanged.
    async fn update_resume(&self, id: Uuid, patch: ResumePatch) -> Result<()>;

    /// All sections of a resume, ordered by `sort_order`.
    async fn list_sections(&self, resume_id: Uuid) -> Result<Vec<SectionRow>>;

    /// Case-sensitive title lookup within one resume.
    async fn get_section_by_title(
        &self,
        resume_id: Uuid,
        title: &str,
    ) -> Result<Option<SectionRow>>;

    /// Inserts a section at `max(sort_order) + 1`.
    async fn insert_section(&self, resume_id: Uuid, section: NewSection) -> Result<SectionRow>;

    async fn update_section_content(&self, section_id: Uuid, content: Value) -> Result<()>;
}
