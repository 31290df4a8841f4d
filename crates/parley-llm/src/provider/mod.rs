//! Provider trait and the OpenAI-compatible backend

pub mod openai;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

pub use self::openai::OpenAiProvider;
use crate::error::LlmError;
use crate::protocol::responses::{ResponsesRequest, ResponsesResponse, ResponsesStreamEvent};
use crate::types::{CompletionRequest, CompletionResponse, StreamEvent};

/// Stream of Chat Completions events
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>;

/// Stream of Responses API events
pub type ResponsesEventStream = Pin<Box<dyn Stream<Item = Result<ResponsesStreamEvent, LlmError>> + Send>>;

/// Trait implemented by each completion backend
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send a non-streaming completion request
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Send a streaming completion request
    ///
    /// Fails with [`LlmError::StreamingUnsupported`] when the provider
    /// refuses to stream; callers may retry through [`Provider::complete`].
    async fn complete_stream(&self, request: &CompletionRequest) -> Result<EventStream, LlmError>;

    /// Run a Responses API request to completion
    async fn respond(&self, request: &ResponsesRequest) -> Result<ResponsesResponse, LlmError>;

    /// Run a Responses API request, streaming its events
    async fn respond_stream(&self, request: &ResponsesRequest) -> Result<ResponsesEventStream, LlmError>;
}
