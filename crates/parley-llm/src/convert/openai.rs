//! Conversion between canonical types and the `OpenAI` wire format

use crate::protocol::openai::{
    OpenAiFunction, OpenAiFunctionCallRef, OpenAiMessage, OpenAiRequest, OpenAiResponse, OpenAiStreamChunk,
    OpenAiTool, OpenAiToolCallRef,
};
use crate::types::{CompletionRequest, CompletionResponse, Message, StreamEvent, ToolCall, ToolCallFragment};

// -- Outbound: canonical request -> wire request --

impl<'a> From<&'a CompletionRequest> for OpenAiRequest<'a> {
    fn from(req: &'a CompletionRequest) -> Self {
        Self {
            model: &req.model,
            messages: req.messages.iter().map(Into::into).collect(),
            temperature: req.temperature,
            stream: req.stream.then_some(true),
            tools: req
                .tools
                .iter()
                .map(|tool| OpenAiTool {
                    function: OpenAiFunction {
                        name: &tool.name,
                        description: tool.description.as_deref(),
                        parameters: tool.parameters.as_ref(),
                    },
                })
                .collect(),
        }
    }
}

impl<'a> From<&'a Message> for OpenAiMessage<'a> {
    fn from(msg: &'a Message) -> Self {
        let tool_calls: Vec<_> = msg
            .tool_calls
            .iter()
            .flatten()
            .map(|call| OpenAiToolCallRef {
                id: &call.id,
                function: OpenAiFunctionCallRef {
                    name: &call.name,
                    arguments: &call.arguments,
                },
            })
            .collect();

        // Assistant turns that only call tools carry null content on the wire
        let content = (!msg.content.is_empty() || tool_calls.is_empty()).then_some(msg.content.as_str());

        Self {
            role: msg.role.as_str(),
            content,
            tool_calls,
            tool_call_id: msg.tool_call_id.as_deref(),
        }
    }
}

// -- Inbound: wire response -> canonical types --

impl From<OpenAiResponse> for CompletionResponse {
    /// Only the first choice counts; parley never asks for more than one
    fn from(resp: OpenAiResponse) -> Self {
        let Some(choice) = resp.choices.into_iter().next() else {
            tracing::warn!("completion response carried no choices");
            return Self::default();
        };

        Self {
            content: choice.message.content.unwrap_or_default(),
            tool_calls: choice
                .message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(|call| ToolCall::new(call.id, call.function.name, call.function.arguments))
                .collect(),
        }
    }
}

/// Flatten a stream chunk into canonical events
///
/// Every tool-call fragment is kept; providers may interleave fragments
/// for several calls in a single chunk.
pub fn openai_chunk_to_events(chunk: OpenAiStreamChunk) -> Vec<StreamEvent> {
    let mut events = Vec::new();

    for choice in chunk.choices {
        let delta = choice.delta;

        if let Some(content) = delta.content.filter(|c| !c.is_empty()) {
            events.push(StreamEvent::Content(content));
        }

        for fragment in delta.tool_calls.into_iter().flatten() {
            let (name, arguments) = fragment.function.map_or((None, None), |f| (f.name, f.arguments));

            events.push(StreamEvent::ToolCall(ToolCallFragment {
                index: fragment.index,
                id: fragment.id,
                name,
                arguments,
            }));
        }
    }

    events
}
