//! Mock completion backend for integration tests
//!
//! Speaks enough of the OpenAI Chat Completions and Responses APIs to
//! drive every strategy from a script.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// One scripted model turn
#[derive(Debug, Clone)]
pub enum MockTurn {
    /// Plain answer
    Text(String),
    /// Tool calls as `(name, raw argument string)`
    ToolCalls(Vec<(String, String)>),
}

impl MockTurn {
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_owned())
    }

    pub fn call(name: &str, arguments: &str) -> Self {
        Self::ToolCalls(vec![(name.to_owned(), arguments.to_owned())])
    }
}

/// Mock backend returning scripted turns
pub struct MockLlm {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockLlmState>,
}

#[derive(Default)]
struct MockLlmState {
    /// Chat turns in order; the last one repeats once the script runs out
    turns: Vec<MockTurn>,
    /// Reject `stream: true` on chat completions the way some models do
    reject_streaming: bool,
    /// Body returned for non-streaming Responses calls
    response: Option<Value>,
    /// Events returned for streaming Responses calls
    response_events: Vec<Value>,
    chat_requests: Mutex<Vec<Value>>,
    responses_requests: Mutex<Vec<Value>>,
}

impl MockLlm {
    /// Serve `turns` on chat completions
    pub async fn start(turns: Vec<MockTurn>) -> anyhow::Result<Self> {
        Self::start_inner(MockLlmState {
            turns,
            ..MockLlmState::default()
        })
        .await
    }

    /// Serve `turns` but refuse streamed chat completions
    pub async fn start_without_streaming(turns: Vec<MockTurn>) -> anyhow::Result<Self> {
        Self::start_inner(MockLlmState {
            turns,
            reject_streaming: true,
            ..MockLlmState::default()
        })
        .await
    }

    /// Answer non-streaming Responses calls with `response`
    pub async fn start_with_response(response: Value) -> anyhow::Result<Self> {
        Self::start_inner(MockLlmState {
            response: Some(response),
            ..MockLlmState::default()
        })
        .await
    }

    /// Answer streaming Responses calls with `events`
    pub async fn start_with_response_events(events: Vec<Value>) -> anyhow::Result<Self> {
        Self::start_inner(MockLlmState {
            response_events: events,
            ..MockLlmState::default()
        })
        .await
    }

    async fn start_inner(state: MockLlmState) -> anyhow::Result<Self> {
        let state = Arc::new(state);

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .route("/v1/responses", routing::post(handle_responses))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the provider
    ///
    /// Includes `/v1` since the provider appends paths like `/chat/completions`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Chat completion request bodies received, rejected ones included
    pub fn chat_requests(&self) -> Vec<Value> {
        self.state.chat_requests.lock().unwrap().clone()
    }

    /// Responses request bodies received
    pub fn responses_requests(&self) -> Vec<Value> {
        self.state.responses_requests.lock().unwrap().clone()
    }
}

impl Drop for MockLlm {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_chat_completions(State(state): State<Arc<MockLlmState>>, Json(body): Json<Value>) -> Response {
    let streaming = body["stream"].as_bool().unwrap_or(false);

    // Answered turns are the successful requests seen so far
    let answered = {
        let mut requests = state.chat_requests.lock().unwrap();
        let answered = requests
            .iter()
            .filter(|r| !(state.reject_streaming && r["stream"].as_bool().unwrap_or(false)))
            .count();
        requests.push(body);
        answered
    };

    if streaming && state.reject_streaming {
        let error = json!({
            "error": {
                "message": "Unsupported value: 'stream' does not support true with this model.",
                "type": "invalid_request_error",
                "param": "stream",
                "code": "unsupported_value"
            }
        });
        return (StatusCode::BAD_REQUEST, Json(error)).into_response();
    }

    let Some(turn) = state.turns.get(answered).or_else(|| state.turns.last()) else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "no scripted turns").into_response();
    };

    if streaming {
        sse_response(&stream_chunks(turn))
    } else {
        Json(completion(turn)).into_response()
    }
}

async fn handle_responses(State(state): State<Arc<MockLlmState>>, Json(body): Json<Value>) -> Response {
    let streaming = body["stream"].as_bool().unwrap_or(false);
    state.responses_requests.lock().unwrap().push(body);

    if streaming {
        let mut payloads: Vec<String> = state.response_events.iter().map(Value::to_string).collect();
        payloads.push("[DONE]".to_owned());
        return sse_response(&payloads);
    }

    match &state.response {
        Some(response) => Json(response.clone()).into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "no scripted response").into_response(),
    }
}

fn sse_response(payloads: &[String]) -> Response {
    let body: String = payloads.iter().map(|p| format!("data: {p}\n\n")).collect();

    Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .body(Body::from(body))
        .unwrap()
}

fn completion(turn: &MockTurn) -> Value {
    let message = match turn {
        MockTurn::Text(text) => json!({"role": "assistant", "content": text}),
        MockTurn::ToolCalls(calls) => json!({
            "role": "assistant",
            "content": null,
            "tool_calls": calls
                .iter()
                .enumerate()
                .map(|(i, (name, arguments))| json!({
                    "id": format!("call_mock_{i}"),
                    "type": "function",
                    "function": {"name": name, "arguments": arguments}
                }))
                .collect::<Vec<_>>()
        }),
    };

    json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "created": 0,
        "model": "mock-model",
        "choices": [{"index": 0, "message": message, "finish_reason": "stop"}],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

/// SSE payloads for one turn, tool arguments split across two fragments
fn stream_chunks(turn: &MockTurn) -> Vec<String> {
    let chunk = |delta: Value, finish: Option<&str>| {
        json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion.chunk",
            "created": 0,
            "model": "mock-model",
            "choices": [{"index": 0, "delta": delta, "finish_reason": finish}]
        })
        .to_string()
    };

    let mut payloads = Vec::new();

    match turn {
        MockTurn::Text(text) => {
            for word in text.split_inclusive(' ') {
                payloads.push(chunk(json!({"content": word}), None));
            }
            payloads.push(chunk(json!({}), Some("stop")));
        }
        MockTurn::ToolCalls(calls) => {
            for (i, (name, arguments)) in calls.iter().enumerate() {
                let (head, tail) = arguments.split_at(arguments.len() / 2);
                payloads.push(chunk(
                    json!({"tool_calls": [{
                        "index": i,
                        "id": format!("call_mock_{i}"),
                        "type": "function",
                        "function": {"name": name, "arguments": head}
                    }]}),
                    None,
                ));
                payloads.push(chunk(
                    json!({"tool_calls": [{"index": i, "function": {"arguments": tail}}]}),
                    None,
                ));
            }
            payloads.push(chunk(json!({}), Some("tool_calls")));
        }
    }

    payloads.push("[DONE]".to_owned());
    payloads
}
