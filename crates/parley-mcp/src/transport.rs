//! Streamable HTTP client that keeps non-standard `tools/call` results
//!
//! Some tool servers answer `tools/call` with a bare JSON payload instead of
//! a content list. rmcp's typed decoder rejects such a result outright, so
//! responses to tool calls are rewritten into a single text block before
//! they reach it. Everything else goes through rmcp's reqwest client as is.

use std::sync::Arc;

use futures_util::StreamExt as _;
use futures_util::stream::BoxStream;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use rmcp::model::{CallToolResult, ClientJsonRpcMessage, ClientRequest, JsonRpcMessage, ServerJsonRpcMessage};
use rmcp::transport::common::http_header::{EVENT_STREAM_MIME_TYPE, HEADER_SESSION_ID, JSON_MIME_TYPE};
use rmcp::transport::streamable_http_client::{
    SseError, StreamableHttpClient, StreamableHttpError, StreamableHttpPostResponse,
};
use serde::Deserialize as _;
use serde_json::{Value, json};
use sse_stream::{Sse, SseStream};

use crate::output::ToolOutput;

type HttpResult<T> = Result<T, StreamableHttpError<reqwest::Error>>;

#[derive(Clone)]
pub struct ToolHttpClient {
    inner: reqwest::Client,
}

impl ToolHttpClient {
    pub const fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    async fn post_tool_call(
        &self,
        uri: &str,
        message: &ClientJsonRpcMessage,
        session_id: Option<Arc<str>>,
        auth_token: Option<String>,
    ) -> HttpResult<StreamableHttpPostResponse> {
        let mut request = self
            .inner
            .post(uri)
            .header(ACCEPT, [EVENT_STREAM_MIME_TYPE, JSON_MIME_TYPE].join(", "));

        if let Some(token) = auth_token {
            request = request.bearer_auth(token);
        }
        if let Some(session_id) = session_id {
            request = request.header(HEADER_SESSION_ID, session_id.as_ref());
        }

        let response = request.json(message).send().await?.error_for_status()?;

        if response.status() == reqwest::StatusCode::ACCEPTED {
            return Ok(StreamableHttpPostResponse::Accepted);
        }

        let session_id = response
            .headers()
            .get(HEADER_SESSION_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        if content_type.starts_with(EVENT_STREAM_MIME_TYPE) {
            let events = SseStream::from_bytes_stream(response.bytes_stream())
                .map(|event| event.map(normalize_event))
                .boxed();
            return Ok(StreamableHttpPostResponse::Sse(events, session_id));
        }

        if content_type.starts_with(JSON_MIME_TYPE) {
            let mut value: Value = response.json().await?;
            normalize_call_result(&mut value);
            let message: ServerJsonRpcMessage = serde_json::from_value(value)?;
            return Ok(StreamableHttpPostResponse::Json(message, session_id));
        }

        tracing::error!(content_type = %content_type, "unexpected content type from MCP server");
        Err(StreamableHttpError::UnexpectedContentType(Some(content_type)))
    }
}

impl StreamableHttpClient for ToolHttpClient {
    type Error = reqwest::Error;

    async fn post_message(
        &self,
        uri: Arc<str>,
        message: ClientJsonRpcMessage,
        session_id: Option<Arc<str>>,
        auth_token: Option<String>,
    ) -> HttpResult<StreamableHttpPostResponse> {
        if is_tool_call(&message) {
            self.post_tool_call(&uri, &message, session_id, auth_token).await
        } else {
            self.inner.post_message(uri, message, session_id, auth_token).await
        }
    }

    async fn delete_session(&self, uri: Arc<str>, session_id: Arc<str>, auth_token: Option<String>) -> HttpResult<()> {
        self.inner.delete_session(uri, session_id, auth_token).await
    }

    async fn get_stream(
        &self,
        uri: Arc<str>,
        session_id: Arc<str>,
        last_event_id: Option<String>,
        auth_token: Option<String>,
    ) -> HttpResult<BoxStream<'static, Result<Sse, SseError>>> {
        self.inner
            .get_stream(uri, session_id, last_event_id, auth_token)
            .await
    }
}

fn is_tool_call(message: &ClientJsonRpcMessage) -> bool {
    matches!(message, JsonRpcMessage::Request(request) if matches!(request.request, ClientRequest::CallToolRequest(_)))
}

fn normalize_event(mut event: Sse) -> Sse {
    if let Some(data) = event.data.as_deref()
        && let Ok(mut value) = serde_json::from_str::<Value>(data)
        && normalize_call_result(&mut value)
    {
        event.data = Some(value.to_string());
    }
    event
}

/// Rewrite a `result` rmcp cannot decode as a tool result
///
/// Returns whether the message changed. Errors, notifications and
/// well-formed results are left alone.
fn normalize_call_result(message: &mut Value) -> bool {
    let Some(result) = message.get_mut("result") else {
        return false;
    };

    if CallToolResult::deserialize(&*result).is_ok() {
        return false;
    }

    let output = ToolOutput::from_json(result);
    let content: Vec<Value> = output
        .blocks
        .iter()
        .map(|block| json!({ "type": "text", "text": block.text }))
        .collect();

    *result = json!({ "content": content, "isError": output.is_error });
    true
}
