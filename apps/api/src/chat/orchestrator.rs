//! The agentic chat loop.
//!
//! One user turn may span several model rounds: the model answers with text
//! and/or tool calls, we execute the calls sequentially, feed the outcomes
//! back as `tool_result` blocks, and go again until the model stops asking
//! for tools or the step ceiling is reached. Tool failures never abort the
//! loop — the failure outcome goes back to the model as data.

use serde_json::{json, Value};
use tracing::{info, warn};

use super::prompts::CHAT_SYSTEM;
use super::transcript::{OrchestrationStep, ToolInvocation};
use crate::errors::AppError;
use crate::llm_client::{ContentBlock, LlmClient};
use crate::tools::{self, ToolContext};

/// What one user turn produced, before transcript assembly.
pub struct TurnResult {
    pub steps: Vec<OrchestrationStep>,
    /// True when at least one tool call succeeded, i.e. the resume on the
    /// server may no longer match what the client last loaded.
    pub mutated: bool,
}

/// A tool_use block lifted out of a response, ready to execute.
#[derive(Debug, PartialEq)]
pub struct ToolUse {
    pub id: String,
    pub name: String,
    pub input: Value,
}

/// Joins the text blocks of one response into the step's narrative.
pub fn collect_narrative(content: &[ContentBlock]) -> Option<String> {
    let texts: Vec<&str> = content
        .iter()
        .filter(|b| b.block_type == "text")
        .filter_map(|b| b.text.as_deref())
        .filter(|t| !t.is_empty())
        .collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    }
}

/// Lifts the tool_use blocks out of one response, preserving order. Blocks
/// missing an id or name are skipped — we cannot route a result back for
/// them, and echoing a malformed block would poison the next round.
pub fn collect_tool_uses(content: &[ContentBlock]) -> Vec<ToolUse> {
    content
        .iter()
        .filter(|b| b.block_type == "tool_use")
        .filter_map(|b| {
            Some(ToolUse {
                id: b.id.clone()?,
                name: b.name.clone()?,
                input: b.input.clone().unwrap_or_else(|| json!({})),
            })
        })
        .collect()
}

/// Replays a response's content as an assistant message body for the next
/// API round.
pub fn assistant_content(content: &[ContentBlock]) -> Vec<Value> {
    content
        .iter()
        .filter_map(|b| match b.block_type.as_str() {
            "text" => Some(json!({"type": "text", "text": b.text.clone().unwrap_or_default()})),
            "tool_use" => Some(json!({
                "type": "tool_use",
                "id": b.id.clone().unwrap_or_default(),
                "name": b.name.clone().unwrap_or_default(),
                "input": b.input.clone().unwrap_or_else(|| json!({})),
            })),
            _ => None,
        })
        .collect()
}

/// Runs one full user turn: up to `max_steps` model rounds with sequential
/// tool execution between them. `history` is prior conversation in Messages
/// API shape, oldest first; the new user message is appended here.
pub async fn run_turn(
    llm: &LlmClient,
    ctx: &ToolContext<'_>,
    history: Vec<Value>,
    user_message: &str,
    max_steps: u32,
) -> Result<TurnResult, AppError> {
    let tool_specs = tools::tool_specs();
    let mut messages = history;
    messages.push(json!({"role": "user", "content": user_message}));

    let mut steps: Vec<OrchestrationStep> = Vec::new();
    let mut mutated = false;

    for round in 0..max_steps {
        let response = llm
            .call_with_tools(CHAT_SYSTEM, &messages, &tool_specs)
            .await
            .map_err(|e| {
                if e.is_auth() {
                    AppError::Unauthorized(e.to_string())
                } else {
                    AppError::Llm(format!("Chat turn failed: {e}"))
                }
            })?;

        let narrative = collect_narrative(&response.content);
        let tool_uses = collect_tool_uses(&response.content);
        let replay = assistant_content(&response.content);
        let wants_tools = response.wants_tools();

        let mut step = OrchestrationStep {
            narrative,
            invocations: Vec::new(),
        };

        // Sequential on purpose: later calls in the same round must see the
        // writes of earlier ones.
        let mut tool_results: Vec<Value> = Vec::new();
        for tool_use in tool_uses {
            let outcome = tools::execute_tool(&tool_use.name, tool_use.input.clone(), ctx).await;
            if outcome.is_success() {
                mutated = true;
            }
            tool_results.push(json!({
                "type": "tool_result",
                "tool_use_id": tool_use.id,
                "content": serde_json::to_string(&outcome).unwrap_or_default(),
                "is_error": !outcome.is_success(),
            }));
            step.invocations.push(ToolInvocation {
                tool: tool_use.name,
                input: tool_use.input,
                outcome,
            });
        }

        steps.push(step);

        if !wants_tools || tool_results.is_empty() {
            if wants_tools {
                warn!("Model stopped for tools but sent no usable tool_use blocks");
            }
            break;
        }

        messages.push(json!({"role": "assistant", "content": replay}));
        messages.push(json!({"role": "user", "content": tool_results}));

        if round + 1 == max_steps {
            info!("Chat turn hit the step ceiling ({max_steps}); returning partial result");
        }
    }

    Ok(TurnResult { steps, mutated })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_block(text: &str) -> ContentBlock {
        ContentBlock {
            block_type: "text".to_string(),
            text: Some(text.to_string()),
            id: None,
            name: None,
            input: None,
        }
    }

    fn tool_block(id: &str, name: &str, input: Value) -> ContentBlock {
        ContentBlock {
            block_type: "tool_use".to_string(),
            text: None,
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            input: Some(input),
        }
    }

    #[test]
    fn test_collect_narrative_joins_text_blocks() {
        let content = vec![
            text_block("I'll add a section."),
            tool_block("t1", "add_section", json!({})),
            text_block("Then update it."),
        ];
        assert_eq!(
            collect_narrative(&content).as_deref(),
            Some("I'll add a section.\nThen update it.")
        );
    }

    #[test]
    fn test_collect_narrative_none_when_no_text() {
        let content = vec![tool_block("t1", "add_section", json!({}))];
        assert_eq!(collect_narrative(&content), None);
        assert_eq!(collect_narrative(&[text_block("")]), None);
    }

    #[test]
    fn test_collect_tool_uses_preserves_order_and_inputs() {
        let content = vec![
            text_block("working"),
            tool_block("t1", "add_section", json!({"title": "Skills"})),
            tool_block("t2", "merge_tags", json!({"category": "Languages"})),
        ];
        let uses = collect_tool_uses(&content);
        assert_eq!(uses.len(), 2);
        assert_eq!(uses[0].id, "t1");
        assert_eq!(uses[0].name, "add_section");
        assert_eq!(uses[1].input["category"], "Languages");
    }

    #[test]
    fn test_collect_tool_uses_skips_malformed_blocks() {
        let mut broken = tool_block("t1", "add_section", json!({}));
        broken.name = None;
        let uses = collect_tool_uses(&[broken, tool_block("t2", "merge_tags", json!({}))]);
        assert_eq!(uses.len(), 1);
        assert_eq!(uses[0].id, "t2");
    }

    #[test]
    fn test_collect_tool_uses_defaults_missing_input_to_empty_object() {
        let mut block = tool_block("t1", "analyze_resume", json!({}));
        block.input = None;
        let uses = collect_tool_uses(&[block]);
        assert_eq!(uses[0].input, json!({}));
    }

    #[test]
    fn test_assistant_content_replays_blocks_in_api_shape() {
        let content = vec![
            text_block("narrative"),
            tool_block("t1", "add_section", json!({"kind": "skills"})),
        ];
        let replay = assistant_content(&content);
        assert_eq!(replay.len(), 2);
        assert_eq!(replay[0], json!({"type": "text", "text": "narrative"}));
        assert_eq!(replay[1]["type"], "tool_use");
        assert_eq!(replay[1]["id"], "t1");
        assert_eq!(replay[1]["input"]["kind"], "skills");
    }
}
