//! Client-facing stream events and their SSE framing

use serde::Serialize;

/// Terminal frame of every stream
pub const DONE_FRAME: &str = "data: [DONE]\n\n";

/// Progress of a single tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolPhase {
    Executing,
    Completed,
    Error,
}

/// Severity of a system notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Event delivered to the chat client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Fragment of the assistant's answer
    ContentDelta { text: String },
    /// Tool call progress
    ToolStatus {
        name: String,
        phase: ToolPhase,
        error: Option<String>,
    },
    /// Out-of-band message about the run
    SystemNotice { message: String, severity: Severity },
    /// End of stream
    Done,
}

impl StreamEvent {
    pub fn content(text: impl Into<String>) -> Self {
        Self::ContentDelta { text: text.into() }
    }

    pub fn tool(name: impl Into<String>, phase: ToolPhase, error: Option<String>) -> Self {
        Self::ToolStatus {
            name: name.into(),
            phase,
            error,
        }
    }

    pub fn notice(message: impl Into<String>, severity: Severity) -> Self {
        Self::SystemNotice {
            message: message.into(),
            severity,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Frame<'a> {
    Content(&'a str),
    ToolCall {
        name: &'a str,
        status: ToolPhase,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<&'a str>,
    },
    System {
        message: &'a str,
        #[serde(rename = "type")]
        severity: Severity,
    },
}

/// Encode one event as an SSE `data:` frame
pub fn encode_frame(event: &StreamEvent) -> String {
    let frame = match event {
        StreamEvent::ContentDelta { text } => Frame::Content(text),
        StreamEvent::ToolStatus { name, phase, error } => Frame::ToolCall {
            name,
            status: *phase,
            error: error.as_deref(),
        },
        StreamEvent::SystemNotice { message, severity } => Frame::System {
            message,
            severity: *severity,
        },
        StreamEvent::Done => return DONE_FRAME.to_owned(),
    };

    data_frame(serde_json::to_string(&frame))
}

const ENCODE_FAILURE_FRAME: &str = "data: {\"system\":{\"message\":\"failed to encode event\",\"type\":\"error\"}}\n\n";

fn data_frame(json: serde_json::Result<String>) -> String {
    match json {
        Ok(json) => format!("data: {json}\n\n"),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode stream event");
            ENCODE_FAILURE_FRAME.to_owned()
        }
    }
}
