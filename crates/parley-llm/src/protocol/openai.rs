//! `OpenAI` Chat Completions wire format
//!
//! Requests borrow from the canonical [`crate::types::CompletionRequest`];
//! responses and stream chunks are decoded leniently, ignoring every field
//! the chat engine has no use for.

use serde::{Deserialize, Serialize};

// -- Request types --

/// Chat completion request body
#[derive(Debug, Serialize)]
pub struct OpenAiRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<OpenAiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<OpenAiTool<'a>>,
}

/// Message within a request
///
/// `content` is serialized as `null` for assistant turns that only call
/// tools.
#[derive(Debug, Serialize)]
pub struct OpenAiMessage<'a> {
    pub role: &'static str,
    pub content: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<OpenAiToolCallRef<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<&'a str>,
}

/// Function tool offered to the model
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "function")]
pub struct OpenAiTool<'a> {
    pub function: OpenAiFunction<'a>,
}

#[derive(Debug, Serialize)]
pub struct OpenAiFunction<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<&'a serde_json::Value>,
}

/// Earlier tool call replayed in the history
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "function")]
pub struct OpenAiToolCallRef<'a> {
    pub id: &'a str,
    pub function: OpenAiFunctionCallRef<'a>,
}

#[derive(Debug, Serialize)]
pub struct OpenAiFunctionCallRef<'a> {
    pub name: &'a str,
    pub arguments: &'a str,
}

// -- Response types --

/// Chat completion response body
#[derive(Debug, Deserialize)]
pub struct OpenAiResponse {
    #[serde(default)]
    pub choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiChoice {
    pub message: OpenAiChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
    /// Absent or `null` when the model answered in text
    #[serde(default)]
    pub tool_calls: Option<Vec<OpenAiToolCall>>,
}

/// Tool call requested in a non-streamed response
#[derive(Debug, Deserialize)]
pub struct OpenAiToolCall {
    pub id: String,
    pub function: OpenAiFunctionCall,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

// -- Streaming types --

/// One `data:` payload of a streamed completion
#[derive(Debug, Deserialize)]
pub struct OpenAiStreamChunk {
    #[serde(default)]
    pub choices: Vec<OpenAiStreamChoice>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiStreamChoice {
    #[serde(default)]
    pub delta: OpenAiStreamDelta,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenAiStreamDelta {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<OpenAiToolCallFragment>>,
}

/// Piece of a streamed tool call
#[derive(Debug, Deserialize)]
pub struct OpenAiToolCallFragment {
    pub index: u32,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub function: Option<OpenAiFunctionFragment>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiFunctionFragment {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

// -- Error response --

/// Error body returned with a non-success status
#[derive(Debug, Deserialize)]
pub struct OpenAiErrorResponse {
    pub error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiErrorDetail {
    #[serde(default)]
    pub message: String,
    /// Request parameter the provider objected to
    #[serde(default)]
    pub param: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl OpenAiErrorDetail {
    /// Whether the provider is refusing to stream rather than failing the request
    pub fn rejects_streaming(&self) -> bool {
        if self.param.as_deref() == Some("stream") {
            return true;
        }

        let message = self.message.to_ascii_lowercase();
        message.contains("stream")
            && (self.code.as_deref() == Some("unsupported_value")
                || message.contains("not supported")
                || message.contains("unsupported"))
    }
}
