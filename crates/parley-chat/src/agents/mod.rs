//! Agents strategy: an agent runtime owns the whole tool loop

mod runtime;
mod sequence;

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt as _;
use parley_mcp::ToolEndpoint;

pub use self::runtime::{AgentDescriptor, AgentEvent, AgentEventStream, AgentRuntime, ResponsesAgentRuntime, RunResult};
pub use self::sequence::SequenceTracker;
use crate::error::ChatError;
use crate::handler::{ChatHandler, ChatHandlerConfig, ChatRequest, HandlerMetadata, HandlerMode};
use crate::shared::{flatten_conversation, hosted_tool, stream_words};
use crate::sink::EventSink;

const AGENT_NAME: &str = "parley";

const METADATA: HandlerMetadata = HandlerMetadata {
    mode: HandlerMode::Agents,
    display_name: "Agents",
    shows_discovery: false,
    live_tool_status: false,
};

pub struct AgentsHandler {
    runtime: Arc<dyn AgentRuntime>,
    endpoint: ToolEndpoint,
}

impl AgentsHandler {
    pub fn new(runtime: Arc<dyn AgentRuntime>, endpoint: ToolEndpoint) -> Self {
        Self { runtime, endpoint }
    }

    fn descriptor(&self, config: &ChatHandlerConfig) -> AgentDescriptor {
        AgentDescriptor {
            name: AGENT_NAME.to_owned(),
            model: config.model.clone(),
            instructions: config.system_message.clone(),
            temperature: Some(config.temperature),
            tools: vec![hosted_tool(&self.endpoint)],
        }
    }
}

#[async_trait]
impl ChatHandler for AgentsHandler {
    fn metadata(&self) -> HandlerMetadata {
        METADATA
    }

    async fn run(&self, request: &ChatRequest, config: &ChatHandlerConfig, sink: &EventSink) -> Result<(), ChatError> {
        self.endpoint.ensure_public()?;

        // Per request: the handler itself is shared between requests
        let mut sequences = SequenceTracker::default();
        let mut emitted = false;
        let mut result = None;

        let agent = self.descriptor(config);
        let mut events = self
            .runtime
            .run_streamed(&agent, flatten_conversation(&request.messages))
            .await?;

        while let Some(event) = events.next().await {
            if sink.is_closed() {
                tracing::debug!("client disconnected, abandoning agent run");
                return Ok(());
            }

            match event? {
                AgentEvent::TextDelta { sequence, delta } => {
                    if !sequences.observe(sequence) {
                        tracing::debug!(sequence, "dropping redelivered text delta");
                        continue;
                    }
                    if !delta.is_empty() {
                        emitted = true;
                        sink.content(delta).await;
                    }
                }
                AgentEvent::MessageOutput { text } => {
                    if !text.is_empty() {
                        emitted = true;
                        stream_words(sink, &text, config.word_delay).await;
                    }
                }
                // Tools already ran by the time these arrive; surfacing them
                // would misrepresent timing
                AgentEvent::ToolCalled { name, arguments } => {
                    tracing::info!(tool = %name, arguments = %arguments, "agent called tool");
                }
                AgentEvent::ToolOutput { name, output } => {
                    tracing::debug!(tool = %name, bytes = output.len(), "agent tool returned");
                }
                AgentEvent::ToolsListed { count } => {
                    tracing::info!(tools = count, "agent listed tools");
                }
                AgentEvent::Completed(run) => result = Some(run),
            }
        }

        if !emitted && let Some(text) = result.as_ref().and_then(RunResult::last_message_text) {
            tracing::debug!("no streamed content, using final run output");
            stream_words(sink, &text, config.word_delay).await;
        }

        Ok(())
    }
}
