use super::message::ToolCall;

/// Assistant turn returned by a non-streaming completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Empty when the model only called tools
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}
