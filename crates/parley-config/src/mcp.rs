use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Remote tool endpoint configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct McpConfig {
    /// Streamable-HTTP MCP endpoint
    pub url: Url,
    /// Label the provider-hosted strategies attach to the endpoint
    #[serde(default = "default_server_label")]
    pub server_label: String,
    /// Reject non-public endpoints for strategies where the provider
    /// connects to the endpoint itself
    #[serde(default = "default_require_public_url")]
    pub require_public_url: bool,
    /// Authentication for the endpoint
    #[serde(default)]
    pub auth: Option<McpAuthConfig>,
}

/// MCP endpoint authentication
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum McpAuthConfig {
    /// Static bearer token
    Token { token: SecretString },
}

fn default_server_label() -> String {
    "tools".to_owned()
}

#[allow(clippy::missing_const_for_fn)]
fn default_require_public_url() -> bool {
    true
}
