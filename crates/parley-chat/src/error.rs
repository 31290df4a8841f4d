use http::StatusCode;
use parley_core::HttpError;
use parley_llm::LlmError;
use parley_mcp::McpError;
use thiserror::Error;

/// Errors raised while resolving or running a chat strategy
#[derive(Debug, Error)]
pub enum ChatError {
    /// Request carried no `mode` field at all
    #[error("mode is required; expected one of proxy, native, agents")]
    MissingMode,

    /// Request carried `"mode": null`
    #[error("mode must not be null; expected one of proxy, native, agents")]
    NullMode,

    /// Request carried `"mode": ""`
    #[error("mode must not be empty; expected one of proxy, native, agents")]
    EmptyMode,

    /// Request named a strategy that does not exist
    #[error("unknown mode '{0}'; expected one of proxy, native, agents")]
    UnknownMode(String),

    /// Request body failed validation
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Tool endpoint cannot serve a provider-hosted strategy
    #[error("tool endpoint {url} is not publicly reachable")]
    Configuration { url: String },

    /// Completion provider failure
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Tool client failure
    #[error(transparent)]
    Mcp(McpError),

    /// The provider or agent runtime reported a failed run
    #[error("{0}")]
    Runtime(String),
}

impl From<McpError> for ChatError {
    fn from(error: McpError) -> Self {
        match error {
            McpError::NonPublicEndpoint { url } => Self::Configuration { url },
            other => Self::Mcp(other),
        }
    }
}

impl HttpError for ChatError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingMode
            | Self::NullMode
            | Self::EmptyMode
            | Self::UnknownMode(_)
            | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Configuration { .. } | Self::Runtime(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Llm(e) => e.status_code(),
            Self::Mcp(e) => e.status_code(),
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::MissingMode
            | Self::NullMode
            | Self::EmptyMode
            | Self::UnknownMode(_)
            | Self::InvalidRequest(_) => "invalid_request_error",
            Self::Configuration { .. } => "configuration_error",
            Self::Runtime(_) => "runtime_error",
            Self::Llm(e) => e.error_type(),
            Self::Mcp(e) => e.error_type(),
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Llm(e) => e.client_message(),
            Self::Mcp(e) => e.client_message(),
            other => other.to_string(),
        }
    }
}
