//! Built-in tools operating on resume sections.
//!
//! Persistence-path note: `rewrite_text` and `update_section_field` share
//! `write_section_field` on purpose — they differ only in how the UI frames
//! them to the model, not in contract.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{decode_input, FieldValue, ToolContext, ToolOutcome};
use crate::extraction;
use crate::llm_client::ToolSpec;
use crate::models::resume::NewSection;
use crate::tools::prompts::{ANALYZE_PROMPT_TEMPLATE, ANALYZE_SYSTEM};
use crate::translation::translate_content;

pub const UPDATE_SECTION_FIELD: &str = "update_section_field";
pub const ADD_SECTION: &str = "add_section";
pub const REWRITE_TEXT: &str = "rewrite_text";
pub const MERGE_TAGS: &str = "merge_tags";
pub const ANALYZE_RESUME: &str = "analyze_resume";
pub const TRANSLATE_SECTION: &str = "translate_section";

/// Section kinds whose default content is an item list.
const LIST_KINDS: &[&str] = &[
    "experience",
    "education",
    "projects",
    "certifications",
    "languages",
];

/// Default content for a freshly added section, keyed on kind.
pub fn default_content(kind: &str) -> Value {
    if LIST_KINDS.contains(&kind) {
        json!({"items": []})
    } else if kind == "skills" {
        json!({"categories": []})
    } else {
        // summary, custom, and anything unrecognized: empty text container
        json!({"content": ""})
    }
}

// ────────────────────────────────────────────────────────────────────────────
// update_section_field / rewrite_text
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UpdateFieldInput {
    section: String,
    field: String,
    /// Literal string, or JSON when it parses as JSON. See `FieldValue`.
    value: String,
}

pub async fn update_section_field(input: Value, ctx: &ToolContext<'_>) -> ToolOutcome {
    let input: UpdateFieldInput = match decode_input(input) {
        Ok(i) => i,
        Err(outcome) => return outcome,
    };
    let value = FieldValue::decode(&input.value).into_value();
    write_section_field(ctx, &input.section, &input.field, value).await
}

#[derive(Debug, Deserialize)]
struct RewriteTextInput {
    section: String,
    field: String,
    text: String,
}

pub async fn rewrite_text(input: Value, ctx: &ToolContext<'_>) -> ToolOutcome {
    let input: RewriteTextInput = match decode_input(input) {
        Ok(i) => i,
        Err(outcome) => return outcome,
    };
    write_section_field(ctx, &input.section, &input.field, Value::String(input.text)).await
}

async fn write_section_field(
    ctx: &ToolContext<'_>,
    section_title: &str,
    field: &str,
    value: Value,
) -> ToolOutcome {
    let section = match ctx
        .store
        .get_section_by_title(ctx.resume_id, section_title)
        .await
    {
        Ok(Some(section)) => section,
        Ok(None) => return ToolOutcome::failure(format!("section '{section_title}' not found")),
        Err(e) => return ToolOutcome::failure(format!("storage error: {e}")),
    };

    let mut content = section.content;
    let Some(obj) = content.as_object_mut() else {
        return ToolOutcome::failure(format!(
            "section '{section_title}' content is not an object"
        ));
    };
    obj.insert(field.to_string(), value.clone());

    match ctx.store.update_section_content(section.id, content).await {
        Ok(()) => ToolOutcome::success(json!({
            "section": section_title,
            "field": field,
            "value": value,
        })),
        Err(e) => ToolOutcome::failure(format!("storage error: {e}")),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// add_section
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AddSectionInput {
    title: String,
    kind: String,
    content: Option<Value>,
}

pub async fn add_section(input: Value, ctx: &ToolContext<'_>) -> ToolOutcome {
    let input: AddSectionInput = match decode_input(input) {
        Ok(i) => i,
        Err(outcome) => return outcome,
    };

    match ctx.store.get_resume(ctx.resume_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return ToolOutcome::failure(format!("resume {} not found", ctx.resume_id)),
        Err(e) => return ToolOutcome::failure(format!("storage error: {e}")),
    }

    let content = input
        .content
        .unwrap_or_else(|| default_content(&input.kind));

    let section = NewSection {
        title: input.title,
        kind: input.kind,
        content,
    };
    match ctx.store.insert_section(ctx.resume_id, section).await {
        Ok(row) => ToolOutcome::success(json!({
            "section_id": row.id,
            "title": row.title,
            "kind": row.kind,
            "sort_order": row.sort_order,
            "content": row.content,
        })),
        Err(e) => ToolOutcome::failure(format!("storage error: {e}")),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// merge_tags
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MergeTagsInput {
    category: String,
    tags: Vec<String>,
}

/// Set-union of suggested tags into one named category of the skills
/// section. Category names match case-sensitively; a missing category is
/// created, a missing skills section is a failure.
pub async fn merge_tags(input: Value, ctx: &ToolContext<'_>) -> ToolOutcome {
    let input: MergeTagsInput = match decode_input(input) {
        Ok(i) => i,
        Err(outcome) => return outcome,
    };

    let sections = match ctx.store.list_sections(ctx.resume_id).await {
        Ok(sections) => sections,
        Err(e) => return ToolOutcome::failure(format!("storage error: {e}")),
    };
    let Some(skills) = sections.into_iter().find(|s| s.kind == "skills") else {
        return ToolOutcome::failure("skills section not found");
    };

    let mut content = skills.content;
    let Some(obj) = content.as_object_mut() else {
        return ToolOutcome::failure("skills section content is not an object");
    };
    let categories = obj
        .entry("categories")
        .or_insert_with(|| json!([]));
    let Some(categories) = categories.as_array_mut() else {
        return ToolOutcome::failure("skills categories is not an array");
    };

    let existing = categories.iter_mut().find(|c| {
        c.get("name").and_then(Value::as_str) == Some(input.category.as_str())
    });

    let merged: Vec<String> = match existing {
        Some(category) => {
            let mut tags: Vec<String> = category
                .get("tags")
                .and_then(Value::as_array)
                .map(|a| {
                    a.iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();
            for tag in input.tags {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
            category["tags"] = json!(tags);
            tags
        }
        None => {
            let mut tags: Vec<String> = Vec::new();
            for tag in input.tags {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
            categories.push(json!({"name": input.category, "tags": tags}));
            tags
        }
    };

    match ctx.store.update_section_content(skills.id, content).await {
        Ok(()) => ToolOutcome::success(json!({
            "category": input.category,
            "tags": merged,
        })),
        Err(e) => ToolOutcome::failure(format!("storage error: {e}")),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// analyze_resume — composite (nested model call + extraction)
// ────────────────────────────────────────────────────────────────────────────

/// Structured analysis the sub-analysis tool extracts and persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalyzeInput {
    #[serde(default)]
    focus: Option<String>,
}

pub async fn analyze_resume(input: Value, ctx: &ToolContext<'_>) -> ToolOutcome {
    let input: AnalyzeInput = match decode_input(input) {
        Ok(i) => i,
        Err(outcome) => return outcome,
    };

    match run_analysis(ctx, input.focus.as_deref()).await {
        Ok(analysis) => match serde_json::to_value(&analysis) {
            Ok(data) => ToolOutcome::success(data),
            Err(e) => ToolOutcome::failure(format!("analysis serialization failed: {e}")),
        },
        Err(e) => ToolOutcome::failure(format!("analysis failed: {e}")),
    }
}

/// Shared by the `analyze_resume` tool and the direct analyze endpoint.
pub async fn run_analysis(
    ctx: &ToolContext<'_>,
    focus: Option<&str>,
) -> anyhow::Result<ResumeAnalysis> {
    let resume = ctx
        .store
        .get_resume(ctx.resume_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("resume {} not found", ctx.resume_id))?;
    let sections = ctx.store.list_sections(ctx.resume_id).await?;

    let resume_json = serde_json::to_string_pretty(&json!({
        "title": resume.title,
        "language": resume.language,
        "sections": sections
            .iter()
            .map(|s| json!({"title": s.title, "kind": s.kind, "content": s.content}))
            .collect::<Vec<_>>(),
    }))?;

    let prompt = ANALYZE_PROMPT_TEMPLATE
        .replace("{resume_json}", &resume_json)
        .replace("{focus}", focus.unwrap_or("overall quality"));

    let raw = ctx.generator.generate(ANALYZE_SYSTEM, &prompt).await?;
    let analysis: ResumeAnalysis = extraction::extract(&raw)?;

    ctx.store
        .update_resume(
            ctx.resume_id,
            crate::models::resume::ResumePatch {
                language: None,
                analysis: Some(serde_json::to_value(&analysis)?),
            },
        )
        .await?;

    Ok(analysis)
}

// ────────────────────────────────────────────────────────────────────────────
// translate_section — composite (nested model call + extraction)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TranslateSectionInput {
    section: String,
    language: String,
}

pub async fn translate_section(input: Value, ctx: &ToolContext<'_>) -> ToolOutcome {
    let input: TranslateSectionInput = match decode_input(input) {
        Ok(i) => i,
        Err(outcome) => return outcome,
    };

    let section = match ctx
        .store
        .get_section_by_title(ctx.resume_id, &input.section)
        .await
    {
        Ok(Some(section)) => section,
        Ok(None) => {
            return ToolOutcome::failure(format!("section '{}' not found", input.section))
        }
        Err(e) => return ToolOutcome::failure(format!("storage error: {e}")),
    };

    let translated = match translate_content(ctx.generator, &section.content, &input.language).await
    {
        Ok(translated) => translated,
        Err(e) => return ToolOutcome::failure(format!("translation failed: {e}")),
    };

    match ctx
        .store
        .update_section_content(section.id, translated.clone())
        .await
    {
        Ok(()) => ToolOutcome::success(json!({
            "section": input.section,
            "language": input.language,
            "content": translated,
        })),
        Err(e) => ToolOutcome::failure(format!("storage error: {e}")),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Declarations for the Messages API
// ────────────────────────────────────────────────────────────────────────────

pub fn specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: UPDATE_SECTION_FIELD.to_string(),
            description: "Update a named field of a named resume section. The value may be a \
                          plain string or a JSON-encoded structure."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "section": {"type": "string", "description": "Section title"},
                    "field": {"type": "string", "description": "Field name inside the section content"},
                    "value": {"type": "string", "description": "New value; JSON strings are decoded"}
                },
                "required": ["section", "field", "value"]
            }),
        },
        ToolSpec {
            name: ADD_SECTION.to_string(),
            description: "Append a new section to the resume. Omit content to get the default \
                          shape for the kind."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string"},
                    "kind": {
                        "type": "string",
                        "enum": ["experience", "education", "projects", "certifications",
                                 "languages", "summary", "custom", "skills"]
                    },
                    "content": {"type": "object", "description": "Optional explicit content"}
                },
                "required": ["title", "kind"]
            }),
        },
        ToolSpec {
            name: REWRITE_TEXT.to_string(),
            description: "Replace the text of a field in a section with rewritten copy."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "section": {"type": "string"},
                    "field": {"type": "string"},
                    "text": {"type": "string"}
                },
                "required": ["section", "field", "text"]
            }),
        },
        ToolSpec {
            name: MERGE_TAGS.to_string(),
            description: "Merge suggested skill tags into a named category of the skills \
                          section, creating the category when absent."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "category": {"type": "string"},
                    "tags": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["category", "tags"]
            }),
        },
        ToolSpec {
            name: ANALYZE_RESUME.to_string(),
            description: "Run a structured analysis of the whole resume and store the report."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "focus": {"type": "string", "description": "Optional aspect to focus on"}
                }
            }),
        },
        ToolSpec {
            name: TRANSLATE_SECTION.to_string(),
            description: "Translate one section's content into a target language and store it."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "section": {"type": "string"},
                    "language": {"type": "string", "description": "Target language tag, e.g. 'de'"}
                },
                "required": ["section", "language"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::test_support::ScriptedGenerator;
    use crate::store::memory::MemoryStore;
    use crate::tools::execute_tool;

    fn ctx<'a>(
        store: &'a MemoryStore,
        generator: &'a ScriptedGenerator,
        resume_id: uuid::Uuid,
    ) -> ToolContext<'a> {
        ToolContext {
            store,
            generator,
            resume_id,
        }
    }

    #[test]
    fn test_default_content_table() {
        assert_eq!(default_content("experience"), json!({"items": []}));
        assert_eq!(default_content("languages"), json!({"items": []}));
        assert_eq!(default_content("skills"), json!({"categories": []}));
        assert_eq!(default_content("summary"), json!({"content": ""}));
        assert_eq!(default_content("something_else"), json!({"content": ""}));
    }

    #[tokio::test]
    async fn test_add_section_uses_default_list_content() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::new(vec![]);
        let resume_id = store.add_resume("CV", "en");

        let outcome = execute_tool(
            ADD_SECTION,
            json!({"title": "Work History", "kind": "experience"}),
            &ctx(&store, &generator, resume_id),
        )
        .await;

        let ToolOutcome::Success { data } = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(data["content"], json!({"items": []}));
        assert_eq!(data["sort_order"], 1);
    }

    #[tokio::test]
    async fn test_add_section_assigns_next_sort_order() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::new(vec![]);
        let resume_id = store.add_resume("CV", "en");
        store.add_section(resume_id, "Summary", "summary", json!({"content": "hi"}));
        store.add_section(resume_id, "Work", "experience", json!({"items": []}));

        let outcome = execute_tool(
            ADD_SECTION,
            json!({"title": "Skills", "kind": "skills"}),
            &ctx(&store, &generator, resume_id),
        )
        .await;

        let ToolOutcome::Success { data } = outcome else {
            panic!("expected success");
        };
        assert_eq!(data["sort_order"], 3);
        assert_eq!(data["content"], json!({"categories": []}));
    }

    #[tokio::test]
    async fn test_add_section_explicit_content_wins_over_default() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::new(vec![]);
        let resume_id = store.add_resume("CV", "en");

        let outcome = execute_tool(
            ADD_SECTION,
            json!({"title": "Note", "kind": "custom", "content": {"content": "keep me"}}),
            &ctx(&store, &generator, resume_id),
        )
        .await;

        let ToolOutcome::Success { data } = outcome else {
            panic!("expected success");
        };
        assert_eq!(data["content"], json!({"content": "keep me"}));
    }

    #[tokio::test]
    async fn test_add_section_missing_resume_fails() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::new(vec![]);

        let outcome = execute_tool(
            ADD_SECTION,
            json!({"title": "X", "kind": "custom"}),
            &ctx(&store, &generator, uuid::Uuid::new_v4()),
        )
        .await;
        assert!(matches!(outcome, ToolOutcome::Failure { .. }));
    }

    #[tokio::test]
    async fn test_update_field_decodes_json_value() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::new(vec![]);
        let resume_id = store.add_resume("CV", "en");
        let section_id = store.add_section(resume_id, "Work", "experience", json!({"items": []}));

        let outcome = execute_tool(
            UPDATE_SECTION_FIELD,
            json!({"section": "Work", "field": "items", "value": "[\"a\", \"b\"]"}),
            &ctx(&store, &generator, resume_id),
        )
        .await;
        assert!(outcome.is_success());

        let content = store.section(section_id).unwrap().content;
        assert_eq!(content["items"], json!(["a", "b"]));
    }

    #[tokio::test]
    async fn test_update_field_keeps_plain_string_verbatim() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::new(vec![]);
        let resume_id = store.add_resume("CV", "en");
        let section_id =
            store.add_section(resume_id, "Summary", "summary", json!({"content": ""}));

        let outcome = execute_tool(
            UPDATE_SECTION_FIELD,
            json!({"section": "Summary", "field": "headline", "value": "Senior Engineer"}),
            &ctx(&store, &generator, resume_id),
        )
        .await;
        assert!(outcome.is_success());

        let content = store.section(section_id).unwrap().content;
        assert_eq!(content["headline"], json!("Senior Engineer"));
    }

    #[tokio::test]
    async fn test_update_field_missing_section_fails() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::new(vec![]);
        let resume_id = store.add_resume("CV", "en");

        let outcome = execute_tool(
            UPDATE_SECTION_FIELD,
            json!({"section": "Nope", "field": "x", "value": "y"}),
            &ctx(&store, &generator, resume_id),
        )
        .await;
        let ToolOutcome::Failure { reason } = outcome else {
            panic!("expected failure");
        };
        assert!(reason.contains("not found"));
    }

    #[tokio::test]
    async fn test_invalid_input_is_failure_not_panic() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::new(vec![]);
        let resume_id = store.add_resume("CV", "en");

        let outcome = execute_tool(
            UPDATE_SECTION_FIELD,
            json!({"section": "Work"}),
            &ctx(&store, &generator, resume_id),
        )
        .await;
        let ToolOutcome::Failure { reason } = outcome else {
            panic!("expected failure");
        };
        assert!(reason.contains("invalid tool input"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_failure() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::new(vec![]);
        let resume_id = store.add_resume("CV", "en");

        let outcome =
            execute_tool("delete_everything", json!({}), &ctx(&store, &generator, resume_id))
                .await;
        assert!(matches!(outcome, ToolOutcome::Failure { .. }));
    }

    #[tokio::test]
    async fn test_rewrite_text_shares_update_path() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::new(vec![]);
        let resume_id = store.add_resume("CV", "en");
        let section_id =
            store.add_section(resume_id, "Summary", "summary", json!({"content": "old"}));

        let outcome = execute_tool(
            REWRITE_TEXT,
            json!({"section": "Summary", "field": "content", "text": "new text"}),
            &ctx(&store, &generator, resume_id),
        )
        .await;
        assert!(outcome.is_success());
        let content = store.section(section_id).unwrap().content;
        assert_eq!(content["content"], json!("new text"));
    }

    #[tokio::test]
    async fn test_merge_tags_unions_into_existing_category() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::new(vec![]);
        let resume_id = store.add_resume("CV", "en");
        let section_id = store.add_section(
            resume_id,
            "Skills",
            "skills",
            json!({"categories": [{"name": "Languages", "tags": ["Rust"]}]}),
        );

        let outcome = execute_tool(
            MERGE_TAGS,
            json!({"category": "Languages", "tags": ["Rust", "SQL"]}),
            &ctx(&store, &generator, resume_id),
        )
        .await;
        assert!(outcome.is_success());

        let content = store.section(section_id).unwrap().content;
        assert_eq!(
            content["categories"][0]["tags"],
            json!(["Rust", "SQL"]),
            "existing tag deduped, new tag appended"
        );
    }

    #[tokio::test]
    async fn test_merge_tags_category_match_is_case_sensitive() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::new(vec![]);
        let resume_id = store.add_resume("CV", "en");
        let section_id = store.add_section(
            resume_id,
            "Skills",
            "skills",
            json!({"categories": [{"name": "languages", "tags": ["Rust"]}]}),
        );

        let outcome = execute_tool(
            MERGE_TAGS,
            json!({"category": "Languages", "tags": ["SQL"]}),
            &ctx(&store, &generator, resume_id),
        )
        .await;
        assert!(outcome.is_success());

        let content = store.section(section_id).unwrap().content;
        let categories = content["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 2, "'languages' != 'Languages'");
    }

    #[tokio::test]
    async fn test_merge_tags_without_skills_section_fails() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::new(vec![]);
        let resume_id = store.add_resume("CV", "en");

        let outcome = execute_tool(
            MERGE_TAGS,
            json!({"category": "Tools", "tags": ["Git"]}),
            &ctx(&store, &generator, resume_id),
        )
        .await;
        let ToolOutcome::Failure { reason } = outcome else {
            panic!("expected failure");
        };
        assert!(reason.contains("skills section not found"));
    }

    #[tokio::test]
    async fn test_analyze_resume_extracts_and_persists() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::single(
            r#"{"strengths": ["clear impact"], "gaps": ["no metrics"], "suggestions": ["quantify"]}"#,
        );
        let resume_id = store.add_resume("CV", "en");
        store.add_section(resume_id, "Work", "experience", json!({"items": []}));

        let outcome = execute_tool(
            ANALYZE_RESUME,
            json!({}),
            &ctx(&store, &generator, resume_id),
        )
        .await;
        let ToolOutcome::Success { data } = outcome else {
            panic!("expected success");
        };
        assert_eq!(data["strengths"], json!(["clear impact"]));

        let resume = store.resume(resume_id).unwrap();
        assert_eq!(resume.analysis.unwrap()["gaps"], json!(["no metrics"]));
    }

    #[tokio::test]
    async fn test_analyze_resume_survives_fenced_output() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::single(
            "```json\n{\"strengths\": [], \"gaps\": [], \"suggestions\": []}\n```",
        );
        let resume_id = store.add_resume("CV", "en");

        let outcome = execute_tool(
            ANALYZE_RESUME,
            json!({}),
            &ctx(&store, &generator, resume_id),
        )
        .await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_translate_section_persists_translation() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::single(r#"{"content": "Hallo Welt"}"#);
        let resume_id = store.add_resume("CV", "en");
        let section_id = store.add_section(
            resume_id,
            "Summary",
            "summary",
            json!({"content": "Hello world"}),
        );

        let outcome = execute_tool(
            TRANSLATE_SECTION,
            json!({"section": "Summary", "language": "de"}),
            &ctx(&store, &generator, resume_id),
        )
        .await;
        assert!(outcome.is_success());

        let content = store.section(section_id).unwrap().content;
        assert_eq!(content["content"], json!("Hallo Welt"));
    }

    #[tokio::test]
    async fn test_translate_section_generator_failure_is_outcome() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::new(vec![Err("model unavailable".to_string())]);
        let resume_id = store.add_resume("CV", "en");
        store.add_section(resume_id, "Summary", "summary", json!({"content": "x"}));

        let outcome = execute_tool(
            TRANSLATE_SECTION,
            json!({"section": "Summary", "language": "fr"}),
            &ctx(&store, &generator, resume_id),
        )
        .await;
        let ToolOutcome::Failure { reason } = outcome else {
            panic!("expected failure");
        };
        assert!(reason.contains("translation failed"));
    }
}
