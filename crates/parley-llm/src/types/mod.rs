//! Canonical completion types the chat engine is written against
//!
//! Only [`Message`] has a serialized form of its own: it is what clients
//! send. Everything else reaches the wire through [`crate::protocol`].

pub mod message;
pub mod request;
pub mod response;
pub mod stream;
pub mod tool;

pub use message::{Message, Role, ToolCall};
pub use request::CompletionRequest;
pub use response::CompletionResponse;
pub use stream::{StreamEvent, ToolCallFragment};
pub use tool::ToolDefinition;
