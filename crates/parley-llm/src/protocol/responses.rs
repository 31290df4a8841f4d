//! `OpenAI` Responses API wire format
//!
//! Only the subset needed for provider-hosted MCP tools: the request with
//! `mcp` tool entries, the output items that describe tool activity and the
//! streaming events the agent runtime consumes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// -- Request types --

/// Responses API request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesRequest {
    /// Model identifier
    pub model: String,
    /// Flattened conversation text
    pub input: String,
    /// System-level instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Hosted tools the provider may call on its own
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ResponsesTool>,
    /// Whether to stream events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// Hosted tool declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsesTool {
    /// Remote MCP server the provider connects to directly
    Mcp {
        /// Label the provider reports back in tool items
        server_label: String,
        /// Publicly reachable MCP endpoint
        server_url: String,
        /// Approval policy, always `never` here
        require_approval: String,
        /// Extra headers sent to the MCP server
        #[serde(default, skip_serializing_if = "Option::is_none")]
        headers: Option<BTreeMap<String, String>>,
    },
}

impl ResponsesTool {
    /// MCP tool that runs without approval prompts
    pub fn mcp(server_label: impl Into<String>, server_url: impl Into<String>) -> Self {
        Self::Mcp {
            server_label: server_label.into(),
            server_url: server_url.into(),
            require_approval: "never".to_owned(),
            headers: None,
        }
    }

    /// Attach a bearer token for the MCP server
    #[must_use]
    pub fn with_bearer(self, token: &str) -> Self {
        match self {
            Self::Mcp {
                server_label,
                server_url,
                require_approval,
                headers,
            } => {
                let mut headers = headers.unwrap_or_default();
                headers.insert("Authorization".to_owned(), format!("Bearer {token}"));

                Self::Mcp {
                    server_label,
                    server_url,
                    require_approval,
                    headers: Some(headers),
                }
            }
        }
    }
}

// -- Response types --

/// Responses API response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponsesResponse {
    /// Response identifier
    #[serde(default)]
    pub id: String,
    /// Lifecycle status (`completed`, `failed`, ...)
    #[serde(default)]
    pub status: Option<String>,
    /// Output items in production order
    #[serde(default)]
    pub output: Vec<OutputItem>,
    /// Failure details when `status` is `failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponsesErrorDetail>,
}

impl ResponsesResponse {
    /// Concatenated text of every message item
    pub fn output_text(&self) -> String {
        self.output.iter().filter_map(OutputItem::message_text).collect()
    }

    /// Tool calls the provider made, in order
    pub fn mcp_calls(&self) -> impl Iterator<Item = &McpCall> {
        self.output.iter().filter_map(|item| match item {
            OutputItem::McpCall(call) => Some(call),
            _ => None,
        })
    }

    /// Tools the provider discovered on the MCP server
    pub fn listed_tools(&self) -> impl Iterator<Item = &McpToolInfo> {
        self.output.iter().flat_map(|item| match item {
            OutputItem::McpListTools { tools, .. } => tools.as_slice(),
            _ => [].as_slice(),
        })
    }
}

/// Error attached to a failed response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponsesErrorDetail {
    /// Error code
    #[serde(default)]
    pub code: Option<String>,
    /// Error message
    #[serde(default)]
    pub message: String,
}

/// Item in a response's output list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    /// Assistant message
    Message {
        /// Item identifier
        #[serde(default)]
        id: Option<String>,
        /// Content parts
        #[serde(default)]
        content: Vec<MessageContent>,
    },
    /// Tool listing performed against an MCP server
    McpListTools {
        /// Label of the MCP server
        #[serde(default)]
        server_label: String,
        /// Tools advertised by the server
        #[serde(default)]
        tools: Vec<McpToolInfo>,
    },
    /// Tool invocation performed by the provider
    McpCall(McpCall),
    /// Item kinds not acted on
    #[serde(other)]
    Other,
}

impl OutputItem {
    /// Text of a message item, `None` for every other kind
    pub fn message_text(&self) -> Option<String> {
        match self {
            Self::Message { content, .. } => Some(
                content
                    .iter()
                    .filter_map(|part| match part {
                        MessageContent::OutputText { text } => Some(text.as_str()),
                        MessageContent::Other => None,
                    })
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// Content part of a message item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    /// Generated text
    OutputText {
        /// Text
        text: String,
    },
    /// Refusals, annotations and other parts
    #[serde(other)]
    Other,
}

/// Tool advertised by an MCP server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolInfo {
    /// Tool name
    pub name: String,
    /// Tool description
    #[serde(default)]
    pub description: Option<String>,
}

/// Tool invocation performed by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpCall {
    /// Item identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Tool name
    pub name: String,
    /// JSON-encoded arguments
    #[serde(default)]
    pub arguments: String,
    /// Tool output text
    #[serde(default)]
    pub output: Option<String>,
    /// Error text when the call failed
    #[serde(default)]
    pub error: Option<String>,
}

// -- Streaming types --

/// Event in a streamed Responses API run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResponsesStreamEvent {
    /// Raw model text fragment
    #[serde(rename = "response.output_text.delta")]
    OutputTextDelta {
        /// Monotonic event number, may be redelivered
        sequence_number: u64,
        /// Item the text belongs to
        #[serde(default)]
        item_id: String,
        /// Text fragment
        delta: String,
    },
    /// Output item started
    #[serde(rename = "response.output_item.added")]
    OutputItemAdded {
        /// The item as known so far
        item: OutputItem,
    },
    /// Output item finished
    #[serde(rename = "response.output_item.done")]
    OutputItemDone {
        /// The final item
        item: OutputItem,
    },
    /// Run finished successfully
    #[serde(rename = "response.completed")]
    Completed {
        /// Final response
        response: ResponsesResponse,
    },
    /// Run failed
    #[serde(rename = "response.failed")]
    Failed {
        /// Response carrying the failure details
        response: ResponsesResponse,
    },
    /// Stream-level error
    #[serde(rename = "error")]
    Error {
        /// Error message
        #[serde(default)]
        message: String,
        /// Error code
        #[serde(default)]
        code: Option<String>,
    },
    /// Event kinds not acted on
    #[serde(other)]
    Other,
}
