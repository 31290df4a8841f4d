//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::time::Duration;

use parley_config::{ChatConfig, Config, HealthConfig, LlmConfig, McpConfig, ServerConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal configuration pointed at a mock completion backend
    pub fn new(llm_base_url: &str) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                },
                llm: LlmConfig {
                    base_url: Some(llm_base_url.parse().expect("valid URL")),
                    api_key: Some(SecretString::from("test-key")),
                },
                mcp: McpConfig {
                    url: "https://tools.example.com/api/mcp".parse().expect("valid URL"),
                    server_label: "tools".to_owned(),
                    require_public_url: true,
                    auth: None,
                },
                chat: ChatConfig {
                    word_delay: Duration::ZERO,
                    ..ChatConfig::default()
                },
                telemetry: None,
            },
        }
    }

    /// Point the tool endpoint somewhere else
    pub fn with_mcp_url(mut self, url: &str) -> Self {
        self.config.mcp.url = url.parse().expect("valid URL");
        self
    }

    /// Bound the proxy loop
    pub fn with_max_tool_loops(mut self, n: u32) -> Self {
        self.config.chat.max_tool_loops = n;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Serve the liveness probe somewhere other than `/health`
    pub fn with_health_path(mut self, path: &str) -> Self {
        path.clone_into(&mut self.config.server.health.path);
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
