//! Tool Call Registry & Executor.
//!
//! Tools are named, schema-declared operations scoped to exactly one resume.
//! The executor validates input by typed decode before running a tool body,
//! re-reads document state from the store on every invocation, and reports
//! every failure (bad input, missing target, storage error) as a `failure`
//! outcome — tool execution never throws to the orchestration loop, so the
//! model can see the error text and react in its next step.

pub mod builtin;
pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::llm_client::{Generator, ToolSpec};
use crate::store::DocumentStore;

/// The result of one tool invocation. Tagged so it persists into transcripts
/// and round-trips through the Messages API unambiguously.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    Success { data: Value },
    Failure { reason: String },
}

impl ToolOutcome {
    pub fn success(data: Value) -> Self {
        ToolOutcome::Success { data }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        ToolOutcome::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }
}

/// Everything a tool may touch: one resume id, the document store, and the
/// generator for composite (sub-analysis / sub-translation) tools. Nothing
/// else is reachable from a tool body.
pub struct ToolContext<'a> {
    pub store: &'a dyn DocumentStore,
    pub generator: &'a dyn Generator,
    pub resume_id: Uuid,
}

/// A string that is decoded as JSON when it parses and kept verbatim
/// otherwise. Tool input values are ambiguous by design — the model sends
/// both `"Senior Engineer"` and `"[\"Rust\", \"SQL\"]"` through the same
/// string parameter — and the ambiguity is resolved here, once, at the tool
/// boundary, never by inspecting the target field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Json(Value),
    Raw(String),
}

impl FieldValue {
    pub fn decode(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => FieldValue::Json(value),
            Err(_) => FieldValue::Raw(raw.to_string()),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            FieldValue::Json(value) => value,
            FieldValue::Raw(raw) => Value::String(raw),
        }
    }
}

/// Declarations of every registered tool, in Messages API shape.
pub fn tool_specs() -> Vec<ToolSpec> {
    builtin::specs()
}

/// Executes one tool call. Exactly one execution per invocation; retry
/// policy belongs to the caller.
pub async fn execute_tool(name: &str, input: Value, ctx: &ToolContext<'_>) -> ToolOutcome {
    info!("Executing tool '{}' for resume {}", name, ctx.resume_id);

    let outcome = match name {
        builtin::UPDATE_SECTION_FIELD => builtin::update_section_field(input, ctx).await,
        builtin::ADD_SECTION => builtin::add_section(input, ctx).await,
        builtin::REWRITE_TEXT => builtin::rewrite_text(input, ctx).await,
        builtin::MERGE_TAGS => builtin::merge_tags(input, ctx).await,
        builtin::ANALYZE_RESUME => builtin::analyze_resume(input, ctx).await,
        builtin::TRANSLATE_SECTION => builtin::translate_section(input, ctx).await,
        _ => ToolOutcome::failure(format!("unknown tool '{name}'")),
    };

    if let ToolOutcome::Failure { reason } = &outcome {
        warn!("Tool '{}' failed: {}", name, reason);
    }
    outcome
}

/// Decodes a typed tool input, mapping decode errors to `failure` outcomes.
fn decode_input<T: serde::de::DeserializeOwned>(input: Value) -> Result<T, ToolOutcome> {
    serde_json::from_value(input)
        .map_err(|e| ToolOutcome::failure(format!("invalid tool input: {e}")))
}
