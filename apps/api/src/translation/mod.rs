//! Streaming batch translation.
//!
//! Translating a resume touches one section per model call, so the endpoint
//! streams newline-delimited JSON instead of blocking until the whole batch
//! finishes: one `progress` line per attempted section, then exactly one
//! terminal `done` line. A failed item keeps its original content and bumps
//! `failedCount`; it never aborts the batch. The resume's language field is
//! only authoritative once `done` has been emitted.
//!
//! If the client disconnects, axum drops the stream and production stops at
//! the next await point — no further lines, no `done` guarantee.

pub mod handlers;
pub mod ndjson;
pub mod prompts;

use std::sync::Arc;

use async_stream::stream;
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::extraction;
use crate::llm_client::Generator;
use crate::models::resume::{ResumePatch, SectionRow};
use crate::store::DocumentStore;
use prompts::{TRANSLATE_PROMPT_TEMPLATE, TRANSLATE_SYSTEM};

/// One NDJSON line of the translation stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TranslateEvent {
    Progress {
        completed: usize,
        total: usize,
        section: SectionRow,
    },
    Done {
        sections: Vec<SectionRow>,
        language: String,
        #[serde(rename = "failedCount")]
        failed_count: usize,
    },
}

/// Translates one content object, preserving its JSON shape. Shared by the
/// batch stream and the `translate_section` tool.
pub async fn translate_content(
    generator: &dyn Generator,
    content: &Value,
    language: &str,
) -> anyhow::Result<Value> {
    let content_json = serde_json::to_string_pretty(content)?;
    let prompt = TRANSLATE_PROMPT_TEMPLATE
        .replace("{language}", language)
        .replace("{content_json}", &content_json);

    let raw = generator.generate(TRANSLATE_SYSTEM, &prompt).await?;
    let translated: Value = extraction::extract(&raw)?;
    Ok(translated)
}

/// Drives the batch: translate each section independently, persist successes,
/// emit one `progress` per attempt and a single `done` after all attempts.
pub fn translate_sections_stream(
    store: Arc<dyn DocumentStore>,
    generator: Arc<dyn Generator>,
    resume_id: Uuid,
    language: String,
    sections: Vec<SectionRow>,
) -> impl Stream<Item = TranslateEvent> + Send {
    stream! {
        let total = sections.len();
        let mut completed = 0usize;
        let mut failed_count = 0usize;

        for mut section in sections {
            match translate_content(generator.as_ref(), &section.content, &language).await {
                Ok(translated) => {
                    match store.update_section_content(section.id, translated.clone()).await {
                        Ok(()) => section.content = translated,
                        Err(e) => {
                            warn!("Persisting translated section '{}' failed: {e}", section.title);
                            failed_count += 1;
                        }
                    }
                }
                Err(e) => {
                    // Skip, keep original content, carry on with the batch.
                    warn!("Translating section '{}' failed: {e}", section.title);
                    failed_count += 1;
                }
            }
            completed += 1;
            yield TranslateEvent::Progress {
                completed,
                total,
                section,
            };
        }

        if let Err(e) = store
            .update_resume(
                resume_id,
                ResumePatch {
                    language: Some(language.clone()),
                    analysis: None,
                },
            )
            .await
        {
            warn!("Updating resume {resume_id} language failed: {e}");
        }

        let sections = match store.list_sections(resume_id).await {
            Ok(sections) => sections,
            Err(e) => {
                warn!("Re-reading sections for resume {resume_id} failed: {e}");
                Vec::new()
            }
        };

        info!(
            "Translation batch for resume {} done: {}/{} ok",
            resume_id,
            total - failed_count,
            total
        );
        yield TranslateEvent::Done {
            sections,
            language,
            failed_count,
        };
    }
}
