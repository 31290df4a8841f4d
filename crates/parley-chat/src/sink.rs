use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

use crate::encoder::{Severity, StreamEvent, ToolPhase};

/// Write side of a client event stream
///
/// Nothing is delivered after [`StreamEvent::Done`]. The sink closes when
/// the receiving side is dropped, which happens when the client goes away.
#[derive(Debug)]
pub struct EventSink {
    tx: mpsc::Sender<StreamEvent>,
    done: AtomicBool,
}

impl EventSink {
    /// Sink and the receiver that feeds the response body
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<StreamEvent>) {
        let (tx, rx) = mpsc::channel(capacity);

        let sink = Self {
            tx,
            done: AtomicBool::new(false),
        };

        (sink, rx)
    }

    /// Deliver one event; `false` when it was not delivered
    pub async fn send(&self, event: StreamEvent) -> bool {
        if self.done.load(Ordering::Acquire) {
            tracing::debug!(?event, "dropping event sent after stream end");
            return false;
        }

        if matches!(event, StreamEvent::Done) {
            self.done.store(true, Ordering::Release);
        }

        self.tx.send(event).await.is_ok()
    }

    pub async fn content(&self, text: impl Into<String> + Send) -> bool {
        self.send(StreamEvent::content(text)).await
    }

    pub async fn tool_status(&self, name: &str, phase: ToolPhase, error: Option<String>) -> bool {
        self.send(StreamEvent::tool(name, phase, error)).await
    }

    pub async fn notice(&self, message: impl Into<String> + Send, severity: Severity) -> bool {
        self.send(StreamEvent::notice(message, severity)).await
    }

    /// Terminate the stream; later calls are ignored
    pub async fn done(&self) -> bool {
        self.send(StreamEvent::Done).await
    }

    /// Whether the client stopped listening
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
