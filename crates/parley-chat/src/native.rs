//! Native strategy: the provider discovers and calls the tools itself

use std::sync::Arc;

use async_trait::async_trait;
use parley_llm::{Provider, ResponsesRequest};
use parley_mcp::ToolEndpoint;

use crate::error::ChatError;
use crate::handler::{ChatHandler, ChatHandlerConfig, ChatRequest, HandlerMetadata, HandlerMode};
use crate::shared::{ToolCallResult, flatten_conversation, hosted_tool, notify_discovery, notify_tool_summary, stream_words};
use crate::sink::EventSink;

const METADATA: HandlerMetadata = HandlerMetadata {
    mode: HandlerMode::Native,
    display_name: "Native",
    shows_discovery: true,
    live_tool_status: false,
};

pub struct NativeHandler {
    provider: Arc<dyn Provider>,
    endpoint: ToolEndpoint,
}

impl NativeHandler {
    pub fn new(provider: Arc<dyn Provider>, endpoint: ToolEndpoint) -> Self {
        Self { provider, endpoint }
    }
}

#[async_trait]
impl ChatHandler for NativeHandler {
    fn metadata(&self) -> HandlerMetadata {
        METADATA
    }

    async fn run(&self, request: &ChatRequest, config: &ChatHandlerConfig, sink: &EventSink) -> Result<(), ChatError> {
        self.endpoint.ensure_public()?;

        let request = ResponsesRequest {
            model: config.model.clone(),
            input: flatten_conversation(&request.messages),
            instructions: Some(config.system_message.clone()),
            temperature: Some(config.temperature),
            tools: vec![hosted_tool(&self.endpoint)],
            stream: None,
        };

        let response = self.provider.respond(&request).await?;

        if response.status.as_deref() == Some("failed") {
            let message = response
                .error
                .map_or_else(|| "response failed".to_owned(), |error| error.message);
            return Err(ChatError::Runtime(message));
        }

        notify_discovery(sink, &METADATA, response.listed_tools().count()).await;

        let results: Vec<ToolCallResult> = response
            .mcp_calls()
            .map(|call| match &call.error {
                Some(error) => ToolCallResult::failed(&call.name, error),
                None => ToolCallResult::completed(&call.name),
            })
            .collect();

        tracing::info!(calls = results.len(), "provider finished tool calls");
        notify_tool_summary(sink, &METADATA, &results).await;

        stream_words(sink, &response.output_text(), config.word_delay).await;

        Ok(())
    }
}
