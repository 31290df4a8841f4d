//! Behavior shared by all strategies

use std::time::Duration;

use parley_core::HttpError;
use parley_llm::{Message, ResponsesTool, Role};
use parley_mcp::ToolEndpoint;
use secrecy::ExposeSecret;

use crate::encoder::{Severity, ToolPhase};
use crate::error::ChatError;
use crate::handler::HandlerMetadata;
use crate::sink::EventSink;

/// Outcome of one tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallResult {
    pub name: String,
    pub success: bool,
    pub error: Option<String>,
}

impl ToolCallResult {
    pub fn completed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: false,
            error: Some(error.into()),
        }
    }

    const fn phase(&self) -> ToolPhase {
        if self.success {
            ToolPhase::Completed
        } else {
            ToolPhase::Error
        }
    }
}

/// Replay a finished text as content deltas, one word at a time
///
/// Words keep their trailing space so the deltas concatenate back to
/// `text` exactly. Stops early once the client is gone.
pub async fn stream_words(sink: &EventSink, text: &str, delay: Duration) {
    let mut words = text.split_inclusive(' ').peekable();

    while let Some(word) = words.next() {
        if !sink.content(word).await {
            return;
        }

        if !delay.is_zero() && words.peek().is_some() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Announce how many tools were found, if the strategy shows discovery
pub async fn notify_discovery(sink: &EventSink, metadata: &HandlerMetadata, count: usize) {
    if !metadata.shows_discovery {
        return;
    }

    let noun = if count == 1 { "tool" } else { "tools" };
    sink.notice(format!("Discovered {count} {noun}"), Severity::Info).await;
}

/// Mark a tool as running, for strategies that report status live
pub async fn notify_tool_started(sink: &EventSink, metadata: &HandlerMetadata, name: &str) {
    if metadata.live_tool_status {
        sink.tool_status(name, ToolPhase::Executing, None).await;
    }
}

/// Report a finished call as it happens, for strategies that report status live
pub async fn notify_tool_finished(sink: &EventSink, metadata: &HandlerMetadata, result: &ToolCallResult) {
    if metadata.live_tool_status {
        sink.tool_status(&result.name, result.phase(), result.error.clone()).await;
    }
}

/// Summarize tool calls after the fact: a count, then one status per call
///
/// Strategies with live status have already reported every call, so they
/// get nothing here.
pub async fn notify_tool_summary(sink: &EventSink, metadata: &HandlerMetadata, results: &[ToolCallResult]) {
    if metadata.live_tool_status || results.is_empty() {
        return;
    }

    sink.notice(format!("Used {} tool(s)", results.len()), Severity::Info)
        .await;

    for result in results {
        sink.tool_status(&result.name, result.phase(), result.error.clone()).await;
    }
}

/// Text of the error notice that ends a failed request
pub fn fatal_notice(metadata: &HandlerMetadata, error: &ChatError) -> String {
    let name = metadata.display_name;

    if let ChatError::Configuration { url } = error {
        return format!(
            "Configuration error: the tool endpoint {url} is not publicly reachable. \
             The {name} strategy requires a public MCP URL; use the proxy strategy for local development."
        );
    }

    let mut others = metadata.mode.alternatives();
    let first = others.next().map(|mode| mode.as_str()).unwrap_or_default();
    let second = others.next().map(|mode| mode.as_str()).unwrap_or_default();

    format!(
        "The {name} strategy failed: {}. Try the {first} or {second} strategy instead.",
        error.client_message()
    )
}

/// Render a conversation as one labeled text blob
pub fn flatten_conversation(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|message| {
            let label = match message.role {
                Role::System => "System",
                Role::User => "User",
                Role::Assistant => "Assistant",
                Role::Tool => "Tool",
            };
            format!("{label}: {}", message.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The tool endpoint as a provider-hosted MCP tool
pub(crate) fn hosted_tool(endpoint: &ToolEndpoint) -> ResponsesTool {
    let tool = ResponsesTool::mcp(&endpoint.server_label, endpoint.url.as_str());

    match &endpoint.token {
        Some(token) => tool.with_bearer(token.expose_secret()),
        None => tool,
    }
}
