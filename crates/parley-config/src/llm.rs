use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Completion provider configuration
///
/// Any OpenAI-compatible endpoint works for the proxy strategy; the native
/// and agents strategies additionally need the Responses API.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Base URL override (defaults to `https://api.openai.com/v1`)
    #[serde(default)]
    pub base_url: Option<Url>,
    /// API key sent as a bearer token
    #[serde(default)]
    pub api_key: Option<SecretString>,
}
