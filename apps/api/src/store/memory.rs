//! In-memory `DocumentStore` used by executor and translation tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::DocumentStore;
use crate::models::resume::{NewSection, ResumePatch, ResumeRow, SectionRow};

#[derive(Default)]
pub struct MemoryStore {
    resumes: Mutex<HashMap<Uuid, ResumeRow>>,
    sections: Mutex<Vec<SectionRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a resume and returns its id.
    pub fn add_resume(&self, title: &str, language: &str) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.resumes.lock().unwrap().insert(
            id,
            ResumeRow {
                id,
                user_id: Uuid::new_v4(),
                title: title.to_string(),
                language: language.to_string(),
                analysis: None,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    /// Seeds a section with explicit content and returns its id.
    pub fn add_section(&self, resume_id: Uuid, title: &str, kind: &str, content: Value) -> Uuid {
        let mut sections = self.sections.lock().unwrap();
        let sort_order = sections
            .iter()
            .filter(|s| s.resume_id == resume_id)
            .map(|s| s.sort_order)
            .max()
            .unwrap_or(0)
            + 1;
        let id = Uuid::new_v4();
        let now = Utc::now();
        sections.push(SectionRow {
            id,
            resume_id,
            title: title.to_string(),
            kind: kind.to_string(),
            content,
            sort_order,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn section(&self, id: Uuid) -> Option<SectionRow> {
        self.sections
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub fn resume(&self, id: Uuid) -> Option<ResumeRow> {
        self.resumes.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRow>> {
        Ok(self.resumes.lock().unwrap().get(&id).cloned())
    }

    async fn update_resume(&self, id: Uuid, patch: ResumePatch) -> Result<()> {
        let mut resumes = self.resumes.lock().unwrap();
        let row = resumes
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("resume {id} not found"))?;
        if let Some(language) = patch.language {
            row.language = language;
        }
        if let Some(analysis) = patch.analysis {
            row.analysis = Some(analysis);
        }
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn list_sections(&self, resume_id: Uuid) -> Result<Vec<SectionRow>> {
        let mut sections: Vec<SectionRow> = self
            .sections
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.resume_id == resume_id)
            .cloned()
            .collect();
        sections.sort_by_key(|s| s.sort_order);
        Ok(sections)
    }

    async fn get_section_by_title(
        &self,
        resume_id: Uuid,
        title: &str,
    ) -> Result<Option<SectionRow>> {
        Ok(self
            .sections
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.resume_id == resume_id && s.title == title)
            .cloned())
    }

    async fn insert_section(&self, resume_id: Uuid, section: NewSection) -> Result<SectionRow> {
        let mut sections = self.sections.lock().unwrap();
        let sort_order = sections
            .iter()
            .filter(|s| s.resume_id == resume_id)
            .map(|s| s.sort_order)
            .max()
            .unwrap_or(0)
            + 1;
        let now = Utc::now();
        let row = SectionRow {
            id: Uuid::new_v4(),
            resume_id,
            title: section.title,
            kind: section.kind,
            content: section.content,
            sort_order,
            created_at: now,
            updated_at: now,
        };
        sections.push(row.clone());
        Ok(row)
    }

    async fn update_section_content(&self, section_id: Uuid, content: Value) -> Result<()> {
        let mut sections = self.sections.lock().unwrap();
        let row = sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or_else(|| anyhow::anyhow!("section {section_id} not found"))?;
        row.content = content;
        row.updated_at = Utc::now();
        Ok(())
    }
}
