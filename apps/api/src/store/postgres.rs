use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::DocumentStore;
use crate::models::resume::{NewSection, ResumePatch, ResumeRow, SectionRow};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRow>> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn update_resume(&self, id: Uuid, patch: ResumePatch) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE resumes
            SET language = COALESCE($2, language),
                analysis = COALESCE($3, analysis),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.language)
        .bind(patch.analysis)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_sections(&self, resume_id: Uuid) -> Result<Vec<SectionRow>> {
        Ok(sqlx::query_as::<_, SectionRow>(
            "SELECT * FROM sections WHERE resume_id = $1 ORDER BY sort_order, id",
        )
        .bind(resume_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_section_by_title(
        &self,
        resume_id: Uuid,
        title: &str,
    ) -> Result<Option<SectionRow>> {
        Ok(sqlx::query_as::<_, SectionRow>(
            "SELECT * FROM sections WHERE resume_id = $1 AND title = $2 LIMIT 1",
        )
        .bind(resume_id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_section(&self, resume_id: Uuid, section: NewSection) -> Result<SectionRow> {
        let current_max: Option<i32> =
            sqlx::query_scalar("SELECT MAX(sort_order) FROM sections WHERE resume_id = $1")
                .bind(resume_id)
                .fetch_one(&self.pool)
                .await?;
        let sort_order = current_max.unwrap_or(0) + 1;

        let row = sqlx::query_as::<_, SectionRow>(
            r#"
            INSERT INTO sections (id, resume_id, title, kind, content, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(resume_id)
        .bind(&section.title)
        .bind(&section.kind)
        .bind(&section.content)
        .bind(sort_order)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Inserted section '{}' ({}) at position {} for resume {}",
            row.title, row.kind, sort_order, resume_id
        );
        Ok(row)
    }

    async fn update_section_content(&self, section_id: Uuid, content: Value) -> Result<()> {
        sqlx::query("UPDATE sections SET content = $2, updated_at = NOW() WHERE id = $1")
            .bind(section_id)
            .bind(content)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
