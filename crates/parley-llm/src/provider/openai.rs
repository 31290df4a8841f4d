//! OpenAI-compatible provider implementation

use std::pin::Pin;

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};
use parley_config::LlmConfig;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use url::Url;

use super::{EventStream, Provider, ResponsesEventStream};
use crate::convert::openai::openai_chunk_to_events;
use crate::error::LlmError;
use crate::protocol::openai::{OpenAiErrorResponse, OpenAiRequest, OpenAiResponse, OpenAiStreamChunk};
use crate::protocol::responses::{ResponsesRequest, ResponsesResponse, ResponsesStreamEvent};
use crate::types::{CompletionRequest, CompletionResponse, StreamEvent};

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible provider
pub struct OpenAiProvider {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl OpenAiProvider {
    /// Create from provider configuration
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let base_url = match &config.base_url {
            Some(url) => url.clone(),
            None => Url::parse(DEFAULT_BASE_URL).map_err(|e| LlmError::Internal(e.to_string()))?,
        };

        Ok(Self {
            client: Client::new(),
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/{path}")
    }

    /// POST a JSON body, mapping transport and status failures
    async fn post<T: Serialize + Sync>(&self, path: &str, body: &T, streaming: bool) -> Result<Response, LlmError> {
        let mut builder = self.client.post(self.endpoint(path)).json(body);

        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(path, error = %e, "upstream request failed");
            LlmError::Upstream(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(path, status = %status, streaming, "upstream returned error");

        Err(upstream_error(status, &body, streaming))
    }
}

/// Classify a non-success provider response
///
/// A client error that names streaming as the problem is reported as
/// [`LlmError::StreamingUnsupported`] so callers can fall back.
fn upstream_error(status: StatusCode, body: &str, streaming: bool) -> LlmError {
    if streaming
        && status.is_client_error()
        && let Ok(parsed) = serde_json::from_str::<OpenAiErrorResponse>(body)
        && parsed.error.rejects_streaming()
    {
        return LlmError::StreamingUnsupported(parsed.error.message);
    }

    LlmError::Upstream(format!("provider returned {status}: {body}"))
}

/// Decode an SSE body, mapping each data payload through `decode`
///
/// The `[DONE]` sentinel is handed to `decode` like any other payload.
fn sse_stream<T, F>(response: Response, decode: F) -> Pin<Box<dyn Stream<Item = Result<T, LlmError>> + Send>>
where
    T: Send + 'static,
    F: Fn(&str) -> Vec<T> + Send + 'static,
{
    let mapped = response
        .bytes_stream()
        .eventsource()
        .map(move |result| match result {
            Ok(event) => decode(event.data.trim()).into_iter().map(Ok).collect(),
            Err(e) => vec![Err(LlmError::Streaming(e.to_string()))],
        })
        .flat_map(futures_util::stream::iter);

    Box::pin(mapped)
}

fn decode_chat_chunk(data: &str) -> Vec<StreamEvent> {
    if data == "[DONE]" {
        return vec![StreamEvent::Done];
    }

    match serde_json::from_str::<OpenAiStreamChunk>(data) {
        Ok(chunk) => openai_chunk_to_events(chunk),
        Err(e) => {
            tracing::debug!(error = %e, data, "skipping unparseable SSE chunk");
            Vec::new()
        }
    }
}

fn decode_responses_event(data: &str) -> Vec<ResponsesStreamEvent> {
    if data == "[DONE]" {
        return Vec::new();
    }

    match serde_json::from_str::<ResponsesStreamEvent>(data) {
        Ok(event) => vec![event],
        Err(e) => {
            tracing::debug!(error = %e, data, "skipping unparseable responses event");
            Vec::new()
        }
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut wire_request = OpenAiRequest::from(request);
        wire_request.stream = None;

        let response = self.post("chat/completions", &wire_request, false).await?;

        let wire_response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Upstream(format!("failed to parse response: {e}")))?;

        Ok(wire_response.into())
    }

    async fn complete_stream(&self, request: &CompletionRequest) -> Result<EventStream, LlmError> {
        let mut wire_request = OpenAiRequest::from(request);
        wire_request.stream = Some(true);

        let response = self.post("chat/completions", &wire_request, true).await?;

        Ok(sse_stream(response, decode_chat_chunk))
    }

    async fn respond(&self, request: &ResponsesRequest) -> Result<ResponsesResponse, LlmError> {
        let wire_request = ResponsesRequest {
            stream: None,
            ..request.clone()
        };

        let response = self.post("responses", &wire_request, false).await?;

        response
            .json()
            .await
            .map_err(|e| LlmError::Upstream(format!("failed to parse response: {e}")))
    }

    async fn respond_stream(&self, request: &ResponsesRequest) -> Result<ResponsesEventStream, LlmError> {
        let wire_request = ResponsesRequest {
            stream: Some(true),
            ..request.clone()
        };

        let response = self.post("responses", &wire_request, true).await?;

        Ok(sse_stream(response, decode_responses_event))
    }
}
