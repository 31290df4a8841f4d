//! Completion provider layer for parley
//!
//! Canonical, provider-agnostic request/response types plus the
//! OpenAI-compatible wire formats (Chat Completions and Responses) and the
//! [`Provider`] trait the chat strategies are written against.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod error;
pub mod protocol;
pub mod provider;
pub mod types;

pub use error::LlmError;
pub use protocol::responses::{
    McpCall, OutputItem, ResponsesRequest, ResponsesResponse, ResponsesStreamEvent, ResponsesTool,
};
pub use provider::{EventStream, OpenAiProvider, Provider, ResponsesEventStream};
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StreamEvent};
