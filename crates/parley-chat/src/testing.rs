//! In-crate fakes for strategy tests

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream;
use parley_llm::protocol::responses::{ResponsesRequest, ResponsesResponse};
use parley_llm::types::{ToolCall, ToolCallFragment};
use parley_llm::{
    CompletionRequest, CompletionResponse, EventStream, LlmError, Message, Provider, ResponsesEventStream,
    ResponsesStreamEvent, StreamEvent as LlmEvent,
};
use parley_mcp::{McpError, ToolArguments, ToolClient, ToolDescriptor, ToolOutput};

use crate::agents::{AgentDescriptor, AgentEvent, AgentEventStream, AgentRuntime};
use crate::encoder::StreamEvent;
use crate::error::ChatError;
use crate::handler::{ChatHandlerConfig, ChatRequest, HandlerMode};
use crate::sink::EventSink;

/// Run `f` against a fresh sink and return everything it sent
pub(crate) async fn collect<F, Fut>(f: F) -> Vec<StreamEvent>
where
    F: FnOnce(EventSink) -> Fut,
    Fut: Future<Output = ()>,
{
    let (sink, mut rx) = EventSink::channel(4096);
    f(sink).await;

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

pub(crate) fn test_config(max_tool_loops: u32) -> ChatHandlerConfig {
    ChatHandlerConfig {
        model: "gpt-4.1-mini".to_owned(),
        temperature: 0.7,
        max_tool_loops,
        system_message: "You are a test assistant.".to_owned(),
        word_delay: Duration::ZERO,
    }
}

pub(crate) fn user_request(text: &str) -> ChatRequest {
    ChatRequest {
        messages: vec![Message::user(text)],
        mode: HandlerMode::Proxy,
    }
}

/// One scripted assistant turn
#[derive(Debug, Clone)]
pub(crate) struct ProviderTurn {
    text: String,
    calls: Vec<ToolCall>,
}

impl ProviderTurn {
    pub(crate) fn text(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            calls: Vec::new(),
        }
    }

    pub(crate) fn calls(calls: Vec<ToolCall>) -> Self {
        Self {
            text: String::new(),
            calls,
        }
    }

    /// Stream events the way a provider fragments them
    fn events(&self) -> Vec<LlmEvent> {
        let mut events: Vec<LlmEvent> = self
            .text
            .split_inclusive(' ')
            .map(|piece| LlmEvent::Content(piece.to_owned()))
            .collect();

        for (index, call) in (0u32..).zip(&self.calls) {
            let (head, tail) = call.arguments.split_at(call.arguments.len() / 2);

            events.push(LlmEvent::ToolCall(ToolCallFragment {
                index,
                id: Some(call.id.clone()),
                name: Some(call.name.clone()),
                arguments: Some(head.to_owned()),
            }));
            events.push(LlmEvent::ToolCall(ToolCallFragment {
                index,
                arguments: Some(tail.to_owned()),
                ..ToolCallFragment::default()
            }));
        }

        events.push(LlmEvent::Done);
        events
    }

    fn response(&self) -> CompletionResponse {
        CompletionResponse {
            content: self.text.clone(),
            tool_calls: self.calls.clone(),
        }
    }
}

/// Provider replaying scripted turns
#[derive(Default)]
pub(crate) struct FakeProvider {
    turns: Mutex<VecDeque<ProviderTurn>>,
    repeat: Option<ProviderTurn>,
    streaming_rejected: bool,
    consumed: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
    response: Option<ResponsesResponse>,
    responses_requests: Mutex<Vec<ResponsesRequest>>,
}

impl FakeProvider {
    pub(crate) fn with_turns(turns: Vec<ProviderTurn>) -> Self {
        Self {
            turns: Mutex::new(turns.into()),
            ..Self::default()
        }
    }

    /// Every completion returns `turn`
    pub(crate) fn repeating(turn: ProviderTurn) -> Self {
        Self {
            repeat: Some(turn),
            ..Self::default()
        }
    }

    pub(crate) fn with_response(response: ResponsesResponse) -> Self {
        Self {
            response: Some(response),
            ..Self::default()
        }
    }

    pub(crate) fn without_streaming(self) -> Self {
        Self {
            streaming_rejected: true,
            ..self
        }
    }

    /// Completions that produced a turn
    pub(crate) fn completion_calls(&self) -> usize {
        self.consumed.load(Ordering::SeqCst)
    }

    pub(crate) fn request(&self, index: usize) -> CompletionRequest {
        self.requests.lock().unwrap()[index].clone()
    }

    pub(crate) fn responses_request(&self) -> Option<ResponsesRequest> {
        self.responses_requests.lock().unwrap().last().cloned()
    }

    fn next_turn(&self, request: &CompletionRequest) -> ProviderTurn {
        let turn = self
            .turns
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.repeat.clone())
            .expect("no scripted turn left");

        self.consumed.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        turn
    }
}

#[async_trait]
impl Provider for FakeProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Ok(self.next_turn(request).response())
    }

    async fn complete_stream(&self, request: &CompletionRequest) -> Result<EventStream, LlmError> {
        if self.streaming_rejected {
            return Err(LlmError::StreamingUnsupported("stream is not supported".to_owned()));
        }

        let events = self.next_turn(request).events();
        Ok(Box::pin(stream::iter(events.into_iter().map(Ok))))
    }

    async fn respond(&self, request: &ResponsesRequest) -> Result<ResponsesResponse, LlmError> {
        self.responses_requests.lock().unwrap().push(request.clone());
        self.response
            .clone()
            .ok_or_else(|| LlmError::Upstream("no scripted response".to_owned()))
    }

    async fn respond_stream(&self, request: &ResponsesRequest) -> Result<ResponsesEventStream, LlmError> {
        self.responses_requests.lock().unwrap().push(request.clone());
        let events: Vec<ResponsesStreamEvent> = Vec::new();
        Ok(Box::pin(stream::iter(events.into_iter().map(Ok))))
    }
}

/// Tool client with canned outputs
pub(crate) struct FakeToolClient {
    tools: Vec<ToolDescriptor>,
    outputs: HashMap<String, ToolOutput>,
    reachable: bool,
    calls: Mutex<Vec<(String, serde_json::Value)>>,
}

impl FakeToolClient {
    pub(crate) fn new(names: &[&str]) -> Self {
        Self {
            tools: names
                .iter()
                .map(|name| ToolDescriptor {
                    name: (*name).to_owned(),
                    description: Some(format!("{name} tool")),
                    input_schema: Some(serde_json::json!({ "type": "object" })),
                })
                .collect(),
            outputs: HashMap::new(),
            reachable: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new(&[])
        }
    }

    pub(crate) fn with_output(mut self, name: &str, text: &str) -> Self {
        self.outputs.insert(name.to_owned(), ToolOutput::text(text));
        self
    }

    pub(crate) fn with_error_output(mut self, name: &str, text: &str) -> Self {
        let mut output = ToolOutput::text(text);
        output.is_error = true;
        self.outputs.insert(name.to_owned(), output);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, serde_json::Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolClient for FakeToolClient {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, McpError> {
        if !self.reachable {
            return Err(McpError::Transport("connection refused".to_owned()));
        }
        Ok(self.tools.clone())
    }

    async fn call_tool(&self, name: &str, arguments: ToolArguments) -> Result<ToolOutput, McpError> {
        if !self.reachable {
            return Err(McpError::Transport("connection refused".to_owned()));
        }

        self.calls
            .lock()
            .unwrap()
            .push((name.to_owned(), serde_json::Value::Object(arguments)));

        Ok(self
            .outputs
            .get(name)
            .cloned()
            .unwrap_or_else(|| ToolOutput::text("ok")))
    }
}

/// Agent runtime replaying a fixed event list
pub(crate) struct FakeRuntime {
    events: Vec<AgentEvent>,
    failure: Option<String>,
    runs: AtomicUsize,
    last_agent: Mutex<Option<AgentDescriptor>>,
}

impl FakeRuntime {
    pub(crate) fn new(events: Vec<AgentEvent>) -> Self {
        Self {
            events,
            failure: None,
            runs: AtomicUsize::new(0),
            last_agent: Mutex::new(None),
        }
    }

    /// Emits `events`, then fails with `message`
    pub(crate) fn failing(events: Vec<AgentEvent>, message: &str) -> Self {
        Self {
            failure: Some(message.to_owned()),
            ..Self::new(events)
        }
    }

    pub(crate) fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub(crate) fn last_agent(&self) -> Option<AgentDescriptor> {
        self.last_agent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentRuntime for FakeRuntime {
    async fn run_streamed(&self, agent: &AgentDescriptor, _input: String) -> Result<AgentEventStream, ChatError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        *self.last_agent.lock().unwrap() = Some(agent.clone());

        let mut items: Vec<Result<AgentEvent, ChatError>> = self.events.iter().cloned().map(Ok).collect();
        if let Some(message) = &self.failure {
            items.push(Err(ChatError::Runtime(message.clone())));
        }

        Ok(Box::pin(stream::iter(items)))
    }
}
