use http::StatusCode;
use serde::Serialize;

/// Domain error that knows how it should look on the wire
///
/// Every parley crate's error enum implements this, and only the server
/// crate turns it into an axum response.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `invalid_request_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;
}

/// JSON error envelope: `{"error": {"type": ..., "message": ...}}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Inner error object of an [`ErrorResponse`]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

impl ErrorResponse {
    /// Build the envelope from any domain error
    pub fn from_error<E: HttpError + ?Sized>(error: &E) -> Self {
        Self {
            error: ErrorBody {
                error_type: error.error_type().to_owned(),
                message: error.client_message(),
            },
        }
    }
}
