use super::message::Message;
use super::tool::ToolDefinition;

/// One completion round
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    /// Conversation, system instruction first
    pub messages: Vec<Message>,
    pub temperature: Option<f64>,
    /// Empty when the model may not call tools
    pub tools: Vec<ToolDefinition>,
    pub stream: bool,
}

impl CompletionRequest {
    /// Same request with streaming turned off
    #[must_use]
    pub fn without_streaming(&self) -> Self {
        Self {
            stream: false,
            ..self.clone()
        }
    }
}
