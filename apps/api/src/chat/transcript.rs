//! Transcript building — turning the step-by-step record of an agentic turn
//! into one persistable entry.
//!
//! The ordering contract is the whole point: for each step, the step's
//! narrative text (when present) comes first, then that step's tool calls in
//! invocation order. Concatenating `parts` in array order reproduces the
//! exact interleaving the model produced; flattening the text into one
//! trailing block would break replay fidelity.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::ToolOutcome;

/// One tool call as it happened: name, raw input, and what came back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool: String,
    pub input: Value,
    pub outcome: ToolOutcome,
}

/// One round of the agentic loop: optional narrative, then zero or more tool
/// calls. Steps are produced in strict chronological order and never
/// reordered afterward.
#[derive(Debug, Clone, Default)]
pub struct OrchestrationStep {
    pub narrative: Option<String>,
    pub invocations: Vec<ToolInvocation>,
}

/// One element of a persisted entry's ordered parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessagePart {
    Text {
        text: String,
    },
    ToolCall {
        tool: String,
        input: Value,
        outcome: ToolOutcome,
    },
}

/// The persisted form of one completed turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// "user" | "assistant"
    pub role: String,
    /// All narrative text of the turn, for display and history replay.
    pub text: String,
    pub parts: Vec<MessagePart>,
}

/// Builds the transcript entry for a completed turn, or `None` when the turn
/// produced neither text nor tool calls — empty turns are not persisted.
pub fn build_transcript_entry(role: &str, steps: &[OrchestrationStep]) -> Option<TranscriptEntry> {
    let mut parts = Vec::new();
    let mut text = String::new();

    for step in steps {
        if let Some(narrative) = step.narrative.as_deref() {
            if !narrative.is_empty() {
                if !text.is_empty() {
                    text.push_str("\n\n");
                }
                text.push_str(narrative);
                parts.push(MessagePart::Text {
                    text: narrative.to_string(),
                });
            }
        }
        for invocation in &step.invocations {
            parts.push(MessagePart::ToolCall {
                tool: invocation.tool.clone(),
                input: invocation.input.clone(),
                outcome: invocation.outcome.clone(),
            });
        }
    }

    if parts.is_empty() {
        return None;
    }
    Some(TranscriptEntry {
        role: role.to_string(),
        text,
        parts,
    })
}

/// A plain user message as a transcript entry.
pub fn user_entry(message: &str) -> TranscriptEntry {
    TranscriptEntry {
        role: "user".to_string(),
        text: message.to_string(),
        parts: vec![MessagePart::Text {
            text: message.to_string(),
        }],
    }
}
