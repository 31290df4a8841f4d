//! Tool discovery and invocation over MCP

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod client;
pub mod endpoint;
pub mod error;
pub mod output;
mod transport;

#[cfg(test)]
mod testing;

use async_trait::async_trait;
use serde::Serialize;

pub use client::McpToolClient;
pub use endpoint::ToolEndpoint;
pub use error::McpError;
pub use output::{TextBlock, ToolOutput};

/// JSON object passed as tool arguments
pub type ToolArguments = serde_json::Map<String, serde_json::Value>;

/// Tool advertised by the remote registry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    /// Tool name, opaque to the orchestrator
    pub name: String,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the arguments
    #[serde(rename = "inputSchema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<serde_json::Value>,
}

/// Discovers and invokes remote tools
#[async_trait]
pub trait ToolClient: Send + Sync {
    /// Full tool catalog
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, McpError>;

    /// Invoke `name` with `arguments`
    ///
    /// A tool that reports failure in its own result comes back as
    /// `Ok` with [`ToolOutput::is_error`] set; `Err` means the call never
    /// produced a result.
    async fn call_tool(&self, name: &str, arguments: ToolArguments) -> Result<ToolOutput, McpError>;
}
