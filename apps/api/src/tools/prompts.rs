// Prompt templates for composite tools.

pub const ANALYZE_SYSTEM: &str = "\
You are a rigorous resume reviewer. \
You MUST respond with valid JSON only — no markdown fences, no explanations. \
Be specific and honest; never invent experience the resume does not contain.";

pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"Review the following resume with a focus on {focus}.

RESUME:
{resume_json}

OUTPUT SCHEMA (return exactly this structure):
{
  "strengths": ["string"],
  "gaps": ["string"],
  "suggestions": ["string"]
}"#;
