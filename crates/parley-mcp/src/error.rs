use http::StatusCode;
use parley_core::HttpError;
use thiserror::Error;

/// Tool client errors
#[derive(Debug, Error)]
pub enum McpError {
    /// Transport-level connection or communication error
    #[error("transport error: {0}")]
    Transport(String),

    /// The server rejected or failed the call
    #[error("tool execution failed: {0}")]
    Execution(String),

    /// Endpoint is not reachable from the public internet
    #[error("tool endpoint {url} is not publicly reachable")]
    NonPublicEndpoint { url: String },

    /// Internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl HttpError for McpError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
            Self::Execution(_) | Self::NonPublicEndpoint { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Transport(_) => "transport_error",
            Self::Execution(_) => "execution_error",
            Self::NonPublicEndpoint { .. } => "configuration_error",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Transport(_) => "failed to communicate with the tool server".to_owned(),
            Self::Execution(msg) => format!("tool execution failed: {msg}"),
            Self::NonPublicEndpoint { url } => format!("tool endpoint {url} is not publicly reachable"),
            Self::Internal(_) => "internal server error".to_owned(),
        }
    }
}
