//! Resume import: raw pasted text in, structured resume out.
//!
//! The model does the structuring; the extraction engine absorbs its output
//! quirks. One quirk is handled here rather than in extraction: some
//! responses arrive as a bare JSON array of sections instead of the wrapped
//! object the prompt asks for, and `normalize_import` wraps those before
//! typed decoding.

pub mod handlers;
pub mod prompts;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::resume::NewSection;

/// The structured form the import prompt asks the model for.
#[derive(Debug, Deserialize)]
pub struct ImportedResume {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    pub sections: Vec<ImportedSection>,
}

#[derive(Debug, Deserialize)]
pub struct ImportedSection {
    pub title: String,
    pub kind: String,
    pub content: Value,
}

impl ImportedSection {
    pub fn into_new_section(self) -> NewSection {
        NewSection {
            title: self.title,
            kind: self.kind,
            content: self.content,
        }
    }
}

/// Wraps a bare section array as `{"sections": [...]}`; objects pass
/// through untouched.
pub fn normalize_import(value: Value) -> Value {
    match value {
        Value::Array(sections) => json!({ "sections": sections }),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array_is_wrapped() {
        let value = json!([{"title": "Skills", "kind": "skills", "content": {}}]);
        let normalized = normalize_import(value);
        assert!(normalized.get("sections").is_some());
        assert_eq!(normalized["sections"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_wrapped_object_passes_through() {
        let value = json!({"title": "CV", "sections": []});
        assert_eq!(normalize_import(value.clone()), value);
    }

    #[test]
    fn test_normalized_value_decodes_to_typed_import() {
        let value = normalize_import(json!([
            {"title": "Experience", "kind": "experience", "content": {"items": []}}
        ]));
        let imported: ImportedResume = serde_json::from_value(value).unwrap();
        assert_eq!(imported.title, None);
        assert_eq!(imported.sections.len(), 1);
        assert_eq!(imported.sections[0].kind, "experience");
    }
}
