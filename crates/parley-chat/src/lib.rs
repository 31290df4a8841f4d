//! Chat orchestration for parley
//!
//! Three interchangeable strategies mediate a streamed conversation between
//! the user, the completion provider and the remote tool server:
//!
//! - [`ProxyHandler`] runs the completion/tool loop itself.
//! - [`NativeHandler`] lets the provider call the tools in one request.
//! - [`AgentsHandler`] hands the whole run to an [`AgentRuntime`].
//!
//! Every strategy writes [`StreamEvent`]s to an [`EventSink`] and always
//! finishes with exactly one [`StreamEvent::Done`].

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod accumulator;
pub mod agents;
pub mod encoder;
pub mod error;
pub mod handler;
pub mod native;
pub mod proxy;
pub mod registry;
pub mod shared;
pub mod sink;

#[cfg(test)]
mod testing;

pub use agents::{AgentEvent, AgentRuntime, AgentsHandler, ResponsesAgentRuntime};
pub use encoder::{Severity, StreamEvent, ToolPhase, encode_frame};
pub use error::ChatError;
pub use handler::{ChatHandler, ChatHandlerConfig, ChatRequest, HandlerMetadata, HandlerMode};
pub use native::NativeHandler;
pub use proxy::ProxyHandler;
pub use registry::{HandlerDependencies, HandlerRegistry, RequestedMode};
pub use sink::EventSink;
