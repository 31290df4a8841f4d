//! The contract every chat strategy implements

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::FutureExt as _;
use parley_config::ChatConfig;
use parley_llm::Message;

use crate::encoder::Severity;
use crate::error::ChatError;
use crate::shared::fatal_notice;
use crate::sink::EventSink;

/// Strategy names accepted in the `mode` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerMode {
    Proxy,
    Native,
    Agents,
}

impl HandlerMode {
    pub const ALL: [Self; 3] = [Self::Proxy, Self::Native, Self::Agents];

    /// Wire name used in requests
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proxy => "proxy",
            Self::Native => "native",
            Self::Agents => "agents",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == name)
    }

    /// The two strategies other than this one
    pub fn alternatives(self) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |mode| *mode != self)
    }
}

impl fmt::Display for HandlerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation policy of a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerMetadata {
    pub mode: HandlerMode,
    /// Name used in notices
    pub display_name: &'static str,
    /// Whether a tool discovery count is announced
    pub shows_discovery: bool,
    /// Whether tool status is streamed while tools run, rather than summarized afterwards
    pub live_tool_status: bool,
}

/// Immutable per-request settings
#[derive(Debug, Clone)]
pub struct ChatHandlerConfig {
    pub model: String,
    pub temperature: f64,
    /// Hard bound on completion/tool rounds
    pub max_tool_loops: u32,
    pub system_message: String,
    /// Pause between words when a finished text is replayed as a stream
    pub word_delay: Duration,
}

impl ChatHandlerConfig {
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tool_loops: config.max_tool_loops,
            system_message: config.system_message.clone(),
            word_delay: config.word_delay,
        }
    }
}

/// Validated chat request
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub mode: HandlerMode,
}

/// A chat strategy
///
/// Instances are cached and shared between concurrent requests, so any
/// per-request state lives on the stack of [`ChatHandler::run`].
#[async_trait]
pub trait ChatHandler: Send + Sync {
    fn metadata(&self) -> HandlerMetadata;

    /// Drive one request, writing events to `sink`
    ///
    /// Must not send [`crate::StreamEvent::Done`]; [`ChatHandler::handle`]
    /// does that.
    async fn run(&self, request: &ChatRequest, config: &ChatHandlerConfig, sink: &EventSink) -> Result<(), ChatError>;

    /// Run the strategy and terminate the stream
    ///
    /// Failures, panics included, become one error notice. Exactly one
    /// `Done` follows in every case.
    async fn handle(&self, request: &ChatRequest, config: &ChatHandlerConfig, sink: &EventSink) {
        let metadata = self.metadata();

        let outcome = AssertUnwindSafe(self.run(request, config, sink))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(ChatError::Runtime("strategy panicked".to_owned())));

        if let Err(error) = outcome {
            tracing::error!(mode = %metadata.mode, error = %error, "chat strategy failed");
            sink.notice(fatal_notice(&metadata, &error), Severity::Error).await;
        }

        sink.done().await;
    }
}
