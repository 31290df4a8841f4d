//! Agent runtime abstraction and its Responses API implementation

use std::collections::HashSet;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt as _};
use parley_llm::{OutputItem, Provider, ResponsesRequest, ResponsesStreamEvent, ResponsesTool};

use crate::error::ChatError;

/// Stream of agent run events
pub type AgentEventStream = Pin<Box<dyn Stream<Item = Result<AgentEvent, ChatError>> + Send>>;

/// What the runtime should run
#[derive(Debug, Clone)]
pub struct AgentDescriptor {
    pub name: String,
    pub model: String,
    pub instructions: String,
    pub temperature: Option<f64>,
    /// Hosted tools the runtime may call
    pub tools: Vec<ResponsesTool>,
}

/// Final state of a run
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub output: Vec<OutputItem>,
}

impl RunResult {
    /// Text of the last non-empty message item
    pub fn last_message_text(&self) -> Option<String> {
        self.output
            .iter()
            .rev()
            .filter_map(OutputItem::message_text)
            .find(|text| !text.is_empty())
    }
}

/// Event produced by an agent run
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// Raw model text; `sequence` may be redelivered
    TextDelta { sequence: u64, delta: String },
    /// A whole message that was not streamed as deltas
    MessageOutput { text: String },
    /// The runtime invoked a tool
    ToolCalled { name: String, arguments: String },
    /// A tool returned
    ToolOutput { name: String, output: String },
    /// The runtime listed the tool server's catalog
    ToolsListed { count: usize },
    /// The run finished
    Completed(RunResult),
}

/// Executes an agent loop end to end
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn run_streamed(&self, agent: &AgentDescriptor, input: String) -> Result<AgentEventStream, ChatError>;
}

/// Agent runtime backed by a streamed Responses API call
pub struct ResponsesAgentRuntime {
    provider: Arc<dyn Provider>,
}

impl ResponsesAgentRuntime {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

/// Translates provider events, remembering which items streamed text
#[derive(Default)]
struct EventTranslator {
    streamed_items: HashSet<String>,
}

impl EventTranslator {
    fn translate(&mut self, event: ResponsesStreamEvent) -> Option<Result<AgentEvent, ChatError>> {
        let event = match event {
            ResponsesStreamEvent::OutputTextDelta {
                sequence_number,
                item_id,
                delta,
            } => {
                self.streamed_items.insert(item_id);
                AgentEvent::TextDelta {
                    sequence: sequence_number,
                    delta,
                }
            }
            ResponsesStreamEvent::OutputItemAdded {
                item: OutputItem::McpCall(call),
            } => AgentEvent::ToolCalled {
                name: call.name,
                arguments: call.arguments,
            },
            ResponsesStreamEvent::OutputItemDone { item } => return self.finished_item(item).map(Ok),
            ResponsesStreamEvent::Completed { response } => AgentEvent::Completed(RunResult {
                output: response.output,
            }),
            ResponsesStreamEvent::Failed { response } => {
                let message = response
                    .error
                    .map_or_else(|| "run failed".to_owned(), |error| error.message);
                return Some(Err(ChatError::Runtime(message)));
            }
            ResponsesStreamEvent::Error { message, .. } => return Some(Err(ChatError::Runtime(message))),
            ResponsesStreamEvent::OutputItemAdded { .. } | ResponsesStreamEvent::Other => return None,
        };

        Some(Ok(event))
    }

    fn finished_item(&self, item: OutputItem) -> Option<AgentEvent> {
        match item {
            OutputItem::McpCall(call) => Some(AgentEvent::ToolOutput {
                name: call.name,
                output: call.error.or(call.output).unwrap_or_default(),
            }),
            OutputItem::McpListTools { tools, .. } => Some(AgentEvent::ToolsListed { count: tools.len() }),
            ref message @ OutputItem::Message { ref id, .. } => {
                let streamed = id.as_ref().is_some_and(|id| self.streamed_items.contains(id));
                let text = message.message_text().filter(|text| !text.is_empty())?;
                (!streamed).then_some(AgentEvent::MessageOutput { text })
            }
            OutputItem::Other => None,
        }
    }
}

#[async_trait]
impl AgentRuntime for ResponsesAgentRuntime {
    async fn run_streamed(&self, agent: &AgentDescriptor, input: String) -> Result<AgentEventStream, ChatError> {
        let request = ResponsesRequest {
            model: agent.model.clone(),
            input,
            instructions: Some(agent.instructions.clone()),
            temperature: agent.temperature,
            tools: agent.tools.clone(),
            stream: Some(true),
        };

        tracing::debug!(agent = %agent.name, model = %agent.model, "starting agent run");

        let mut translator = EventTranslator::default();
        let events = self
            .provider
            .respond_stream(&request)
            .await?
            .filter_map(move |event| {
                let translated = match event {
                    Ok(event) => translator.translate(event),
                    Err(e) => Some(Err(ChatError::from(e))),
                };
                std::future::ready(translated)
            });

        Ok(Box::pin(events))
    }
}
