//! Proxy strategy: the completion/tool loop runs here

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt as _;
use parley_core::HttpError;
use parley_llm::types::{ToolCall, ToolDefinition};
use parley_llm::{CompletionRequest, EventStream, LlmError, Message, Provider, StreamEvent as LlmEvent};
use parley_mcp::{ToolArguments, ToolClient, ToolDescriptor};

use crate::accumulator::ToolCallAccumulator;
use crate::encoder::Severity;
use crate::error::ChatError;
use crate::handler::{ChatHandler, ChatHandlerConfig, ChatRequest, HandlerMetadata, HandlerMode};
use crate::shared::{ToolCallResult, notify_discovery, notify_tool_finished, notify_tool_started, stream_words};
use crate::sink::EventSink;

/// Tool result text for arguments that are not a JSON object
pub const MALFORMED_ARGUMENTS: &str = "Invalid JSON in tool arguments";

const STREAMING_FALLBACK_NOTICE: &str = "Streaming is not available for this model; delivering the complete response instead.";

const METADATA: HandlerMetadata = HandlerMetadata {
    mode: HandlerMode::Proxy,
    display_name: "Proxy",
    shows_discovery: true,
    live_tool_status: true,
};

/// Assistant turn as assembled from the provider
struct Turn {
    text: String,
    tool_calls: Vec<ToolCall>,
}

pub struct ProxyHandler {
    provider: Arc<dyn Provider>,
    tools: Arc<dyn ToolClient>,
}

impl ProxyHandler {
    pub fn new(provider: Arc<dyn Provider>, tools: Arc<dyn ToolClient>) -> Self {
        Self { provider, tools }
    }

    /// One completion, streamed when the provider allows it
    ///
    /// `streaming` is cleared on the first rejection so later rounds go
    /// straight to the non-streaming path.
    async fn complete_turn(
        &self,
        request: CompletionRequest,
        streaming: &mut bool,
        config: &ChatHandlerConfig,
        sink: &EventSink,
    ) -> Result<Turn, ChatError> {
        if *streaming {
            match self.provider.complete_stream(&request).await {
                Ok(stream) => return consume_stream(stream, sink).await,
                Err(LlmError::StreamingUnsupported(reason)) => {
                    tracing::info!(reason, "provider rejected streaming, falling back");
                    *streaming = false;
                    sink.notice(STREAMING_FALLBACK_NOTICE, Severity::Info).await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        let response = self.provider.complete(&request.without_streaming()).await?;
        stream_words(sink, &response.content, config.word_delay).await;

        Ok(Turn {
            text: response.content,
            tool_calls: response.tool_calls,
        })
    }

    /// Run one tool call, returning the text fed back to the model
    async fn execute(&self, call: &ToolCall, sink: &EventSink) -> String {
        let name = call.name.as_str();
        notify_tool_started(sink, &METADATA, name).await;

        let outcome = match parse_arguments(&call.arguments) {
            Some(arguments) => match self.tools.call_tool(name, arguments).await {
                Ok(output) if output.is_error => Err(output.as_text()),
                Ok(output) => Ok(output.as_text()),
                Err(e) => {
                    tracing::warn!(tool = name, error = %e, "tool call failed");
                    Err(e.client_message())
                }
            },
            None => Err(MALFORMED_ARGUMENTS.to_owned()),
        };

        let (result, content) = match outcome {
            Ok(text) => (ToolCallResult::completed(name), text),
            Err(message) => {
                let content = format!("Error: {message}");
                (ToolCallResult::failed(name, message), content)
            }
        };

        notify_tool_finished(sink, &METADATA, &result).await;
        content
    }
}

/// Forward content as it arrives while collecting tool-call fragments
async fn consume_stream(mut stream: EventStream, sink: &EventSink) -> Result<Turn, ChatError> {
    let mut text = String::new();
    let mut accumulator = ToolCallAccumulator::default();

    while let Some(event) = stream.next().await {
        match event? {
            LlmEvent::Content(content) => {
                text.push_str(&content);
                sink.content(content).await;
            }
            LlmEvent::ToolCall(fragment) => accumulator.push(fragment),
            LlmEvent::Done => break,
        }
    }

    Ok(Turn {
        text,
        tool_calls: accumulator.finish(),
    })
}

/// Tool arguments as a JSON object; an empty string means no arguments
fn parse_arguments(raw: &str) -> Option<ToolArguments> {
    if raw.trim().is_empty() {
        return Some(ToolArguments::new());
    }

    match serde_json::from_str(raw) {
        Ok(serde_json::Value::Object(arguments)) => Some(arguments),
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "tool arguments are not an object");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "tool arguments are not valid JSON");
            None
        }
    }
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn tool_definition(tool: &ToolDescriptor) -> ToolDefinition {
    ToolDefinition::new(&tool.name, tool.description.clone(), tool.input_schema.clone())
}

#[async_trait]
impl ChatHandler for ProxyHandler {
    fn metadata(&self) -> HandlerMetadata {
        METADATA
    }

    async fn run(&self, request: &ChatRequest, config: &ChatHandlerConfig, sink: &EventSink) -> Result<(), ChatError> {
        let catalog = self.tools.list_tools().await?;
        notify_discovery(sink, &METADATA, catalog.len()).await;

        let tools: Vec<ToolDefinition> = catalog.iter().map(tool_definition).collect();

        let mut history = Vec::with_capacity(request.messages.len() + 1);
        history.push(Message::system(&config.system_message));
        history.extend(request.messages.iter().cloned());

        let mut streaming = true;

        for round in 1..=config.max_tool_loops {
            if sink.is_closed() {
                tracing::debug!(round, "client disconnected, stopping tool loop");
                return Ok(());
            }

            let completion = CompletionRequest {
                model: config.model.clone(),
                messages: history.clone(),
                temperature: Some(config.temperature),
                tools: tools.clone(),
                stream: streaming,
            };

            let turn = self.complete_turn(completion, &mut streaming, config, sink).await?;
            history.push(Message::assistant(turn.text, turn.tool_calls.clone()));

            if turn.tool_calls.is_empty() {
                tracing::debug!(round, "model settled on an answer");
                return Ok(());
            }

            tracing::info!(round, calls = turn.tool_calls.len(), "executing tool calls");

            for call in &turn.tool_calls {
                if sink.is_closed() {
                    return Ok(());
                }

                let content = self.execute(call, sink).await;
                history.push(Message::tool(&call.id, content));
            }
        }

        tracing::warn!(max_tool_loops = config.max_tool_loops, "tool loop exhausted");
        sink.notice(
            format!(
                "Stopped after {} tool rounds; the answer may be incomplete.",
                config.max_tool_loops
            ),
            Severity::Warning,
        )
        .await;

        Ok(())
    }
}
