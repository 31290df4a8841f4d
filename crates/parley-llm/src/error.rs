use http::StatusCode;
use parley_core::HttpError;
use thiserror::Error;

/// Errors that can occur while talking to the completion provider
#[derive(Debug, Error)]
pub enum LlmError {
    /// Provider returned a non-success response or could not be reached
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Error while consuming a streamed response
    #[error("streaming error: {0}")]
    Streaming(String),

    /// Provider refused to stream for this model or account
    ///
    /// Recoverable: callers retry the same request without streaming.
    #[error("streaming not supported: {0}")]
    StreamingUnsupported(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl HttpError for LlmError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Upstream(_) | Self::StreamingUnsupported(_) => StatusCode::BAD_GATEWAY,
            Self::Streaming(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Upstream(_) => "upstream_error",
            Self::Streaming(_) => "streaming_error",
            Self::StreamingUnsupported(_) => "streaming_unsupported",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Upstream(_) => "the language model provider returned an error".to_owned(),
            Self::Streaming(_) => "the language model stream was interrupted".to_owned(),
            Self::StreamingUnsupported(_) => "streaming is not available for this model".to_owned(),
            Self::Internal(_) => "an internal error occurred".to_owned(),
        }
    }
}
