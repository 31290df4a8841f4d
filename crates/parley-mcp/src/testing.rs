//! Scripted streamable-HTTP MCP server for client tests

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

use crate::endpoint::ToolEndpoint;

const SESSION_HEADER: &str = "mcp-session-id";

/// MCP server answering `tools/call` from a fixed table of results
pub struct ScriptedMcpServer {
    addr: SocketAddr,
    state: Arc<ScriptedState>,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct ScriptedState {
    /// Raw `result` returned per tool name
    results: HashMap<String, Value>,
    live_sessions: Mutex<HashSet<String>>,
    sessions_opened: Mutex<usize>,
    tool_calls: Mutex<Vec<String>>,
    authorization: Mutex<Vec<Option<String>>>,
}

impl ScriptedMcpServer {
    pub async fn start(results: &[(&str, Value)]) -> Self {
        let state = Arc::new(ScriptedState {
            results: results
                .iter()
                .map(|(name, result)| ((*name).to_owned(), result.clone()))
                .collect(),
            ..ScriptedState::default()
        });

        let app = Router::new()
            .route("/mcp", routing::post(handle_rpc))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr, state, task }
    }

    pub fn endpoint(&self, token: Option<&str>) -> ToolEndpoint {
        ToolEndpoint {
            url: Url::parse(&format!("http://{}/mcp", self.addr)).unwrap(),
            server_label: "scripted".to_owned(),
            token: token.map(|token| SecretString::from(token.to_owned())),
            require_public: false,
        }
    }

    /// Forget every open session, as a restarted server would
    pub fn expire_sessions(&self) {
        self.state.live_sessions.lock().unwrap().clear();
    }

    pub fn sessions_opened(&self) -> usize {
        *self.state.sessions_opened.lock().unwrap()
    }

    /// Tool names that reached a live session, in order
    pub fn tool_calls(&self) -> Vec<String> {
        self.state.tool_calls.lock().unwrap().clone()
    }

    /// `Authorization` header of every POST
    pub fn authorization(&self) -> Vec<Option<String>> {
        self.state.authorization.lock().unwrap().clone()
    }
}

impl Drop for ScriptedMcpServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle_rpc(State(state): State<Arc<ScriptedState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
    state.authorization.lock().unwrap().push(header("authorization"));

    let method = body["method"].as_str().unwrap_or_default();
    let id = body.get("id").cloned();

    if method == "initialize" {
        let session = {
            let mut opened = state.sessions_opened.lock().unwrap();
            *opened += 1;
            format!("session-{}", *opened)
        };
        state.live_sessions.lock().unwrap().insert(session.clone());

        let result = json!({
            "protocolVersion": "2025-03-26",
            "capabilities": { "tools": {} },
            "serverInfo": { "name": "scripted", "version": "0.1.0" }
        });
        return ([(SESSION_HEADER, session)], reply(id, result)).into_response();
    }

    let live = header(SESSION_HEADER).is_some_and(|session| state.live_sessions.lock().unwrap().contains(&session));
    if !live {
        return StatusCode::NOT_FOUND.into_response();
    }

    // Notifications carry no id
    let Some(id) = id else {
        return StatusCode::ACCEPTED.into_response();
    };

    match method {
        "tools/list" => {
            let tools: Vec<Value> = state
                .results
                .keys()
                .map(|name| json!({ "name": name, "inputSchema": { "type": "object" } }))
                .collect();
            reply(Some(id), json!({ "tools": tools })).into_response()
        }
        "tools/call" => {
            let name = body["params"]["name"].as_str().unwrap_or_default().to_owned();
            state.tool_calls.lock().unwrap().push(name.clone());

            match state.results.get(&name) {
                Some(result) => reply(Some(id), result.clone()).into_response(),
                None => Json(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": { "code": -32602, "message": format!("unknown tool {name}") }
                }))
                .into_response(),
            }
        }
        _ => StatusCode::NOT_IMPLEMENTED.into_response(),
    }
}

fn reply(id: Option<Value>, result: Value) -> Json<Value> {
    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}
