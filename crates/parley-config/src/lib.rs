#![allow(clippy::must_use_candidate)]

pub mod chat;
mod env;
pub mod llm;
mod loader;
pub mod mcp;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use chat::*;
pub use llm::*;
pub use mcp::*;
pub use server::*;
pub use telemetry::{ExportProtocol, ExporterConfig, LogFormat, TelemetryConfig};

/// Top-level parley configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Completion provider configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Tool endpoint configuration
    pub mcp: McpConfig,
    /// Chat orchestration settings
    #[serde(default)]
    pub chat: ChatConfig,
    /// Logging and trace export
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
