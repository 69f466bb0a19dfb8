//! The response envelope.
//!
//! Every dispatch produces exactly one `ToolResult`: text content blocks
//! plus an error flag. Success omits the flag on the wire; an error result
//! never carries partial data alongside it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Result;

/// One piece of tool output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

/// The envelope every tool invocation resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ContentBlock>,

    #[serde(rename = "isError", default, skip_serializing_if = "is_false")]
    pub is_error: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

impl ToolResult {
    /// Success envelope carrying one pretty-printed JSON block.
    pub fn success_json(value: &Value) -> Result<Self> {
        let text = serde_json::to_string_pretty(value)?;
        Ok(Self::success_text(text))
    }

    /// Success envelope carrying literal text.
    pub fn success_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Error envelope.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// All text blocks joined, for asserts and logging.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|ContentBlock::Text { text }| text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_success_omits_error_flag_on_wire() {
        let result = ToolResult::success_text("hi");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"content": [{"type": "text", "text": "hi"}]})
        );
    }

    #[test]
    fn test_error_flag_serializes_when_set() {
        let result = ToolResult::error("unknown tool: x");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "content": [{"type": "text", "text": "unknown tool: x"}],
                "isError": true,
            })
        );
    }

    #[test]
    fn test_success_json_pretty_prints() {
        let result = ToolResult::success_json(&json!({"bill": {"number": "1"}})).unwrap();
        assert_eq!(
            result.text(),
            "{\n  \"bill\": {\n    \"number\": \"1\"\n  }\n}"
        );
        assert!(!result.is_error);
    }

    #[test]
    fn test_missing_flag_deserializes_as_success() {
        let result: ToolResult =
            serde_json::from_value(json!({"content": [{"type": "text", "text": "ok"}]})).unwrap();
        assert!(!result.is_error);
        assert_eq!(result.text(), "ok");
    }
}
