//! Normalization of tool results into text

use serde_json::Value;

/// One text block of a tool result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    /// Block text
    pub text: String,
}

/// Tool result reduced to ordered text blocks
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolOutput {
    /// Text blocks in server order
    pub blocks: Vec<TextBlock>,
    /// Whether the tool reported failure
    pub is_error: bool,
}

impl ToolOutput {
    /// Single-block output
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            blocks: vec![TextBlock { text: text.into() }],
            is_error: false,
        }
    }

    /// Normalize an arbitrary tool response
    ///
    /// A `content` list yields its `text` blocks. An empty list falls back
    /// to `structuredContent` when present. Any other payload becomes one
    /// block holding the serialized JSON.
    pub fn from_json(value: &Value) -> Self {
        let is_error = value.get("isError").and_then(Value::as_bool).unwrap_or(false);

        let blocks = match (value.get("content").and_then(Value::as_array), value.get("structuredContent")) {
            (Some(content), _) if !content.is_empty() => content.iter().filter_map(text_block).collect(),
            (Some(_), Some(structured)) => vec![serialized(structured)],
            _ => vec![serialized(value)],
        };

        Self { blocks, is_error }
    }

    /// Blocks joined with newlines
    pub fn as_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn text_block(block: &Value) -> Option<TextBlock> {
    if block.get("type").and_then(Value::as_str) != Some("text") {
        return None;
    }

    let text = block.get("text").and_then(Value::as_str)?;
    Some(TextBlock { text: text.to_owned() })
}

fn serialized(value: &Value) -> TextBlock {
    TextBlock {
        text: value.to_string(),
    }
}
