use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Chat orchestration settings shared by every strategy
///
/// Supplied by the operator, never by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Model identifier sent to the provider
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Upper bound on completion / tool-call rounds per request
    #[serde(default = "default_max_tool_loops")]
    pub max_tool_loops: u32,
    /// System instruction prepended to every conversation
    #[serde(default = "default_system_message")]
    pub system_message: String,
    /// Pause between words when delivering an already-complete answer
    #[serde(default = "default_word_delay", deserialize_with = "deserialize_delay")]
    pub word_delay: Duration,
    /// Maximum number of messages accepted in one request
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tool_loops: default_max_tool_loops(),
            system_message: default_system_message(),
            word_delay: default_word_delay(),
            max_messages: default_max_messages(),
        }
    }
}

fn default_model() -> String {
    "gpt-4.1-mini".to_owned()
}

#[allow(clippy::missing_const_for_fn)]
fn default_temperature() -> f64 {
    0.7
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_tool_loops() -> u32 {
    6
}

fn default_system_message() -> String {
    "You are a helpful assistant. Use the available tools to look up facts before answering, \
     and say so when a tool does not return what you need."
        .to_owned()
}

/// Parse human durations such as `"15ms"` or `"0s"`
fn deserialize_delay<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    duration_str::parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid duration '{raw}': {e}")))
}

#[allow(clippy::missing_const_for_fn)]
fn default_word_delay() -> Duration {
    Duration::from_millis(15)
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_messages() -> usize {
    50
}
