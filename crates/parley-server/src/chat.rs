//! `POST /api/chat`: validate, pick a strategy, stream its events

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use http::{HeaderValue, header};
use parley_chat::{ChatError, ChatHandlerConfig, ChatRequest, EventSink, HandlerRegistry, RequestedMode, encode_frame};
use parley_core::{ErrorResponse, HttpError};
use parley_llm::{Message, Role};
use serde::Deserialize;
use tracing::Instrument as _;

/// Events buffered between a strategy and the response body
const SINK_CAPACITY: usize = 64;

/// Shared state of the chat route
#[derive(Clone)]
pub struct ChatState {
    pub registry: Arc<HandlerRegistry>,
    pub config: Arc<ChatHandlerConfig>,
    pub max_messages: usize,
}

/// Inbound request body
#[derive(Debug, Deserialize)]
struct ChatBody {
    messages: Vec<Message>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    mode: Option<Option<String>>,
}

/// Build the chat router
pub fn chat_router(state: ChatState) -> Router {
    Router::new()
        .route("/api/chat", routing::post(chat))
        .with_state(state)
}

async fn chat(State(state): State<ChatState>, body: Result<Json<ChatBody>, JsonRejection>) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            let error = ChatError::InvalidRequest(rejection.body_text());
            return error_response(&error);
        }
    };

    if let Err(error) = validate_messages(&body.messages, state.max_messages) {
        return error_response(&error);
    }

    let requested = RequestedMode::from(body.mode);
    let handler = match state.registry.get(&requested) {
        Ok(handler) => handler,
        Err(error) => return error_response(&error),
    };

    let mode = handler.metadata().mode;
    let request = ChatRequest {
        messages: body.messages,
        mode,
    };

    tracing::info!(mode = %mode, messages = request.messages.len(), "chat request accepted");

    let (sink, rx) = EventSink::channel(SINK_CAPACITY);
    let config = state.config.clone();

    tokio::spawn(
        async move {
            handler.handle(&request, &config, &sink).await;
        }
        .instrument(tracing::info_span!("chat_request", mode = %mode)),
    );

    let frames = futures_util::stream::unfold(rx, |mut rx| async move {
        let event = rx.recv().await?;
        Some((Ok::<_, Infallible>(encode_frame(&event)), rx))
    });

    let mut response = Body::from_stream(frames).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

/// Reject histories no strategy should be handed
fn validate_messages(messages: &[Message], max_messages: usize) -> Result<(), ChatError> {
    if messages.is_empty() {
        return Err(ChatError::InvalidRequest("messages must not be empty".to_owned()));
    }

    if messages.len() > max_messages {
        return Err(ChatError::InvalidRequest(format!(
            "too many messages: {} exceeds the limit of {max_messages}",
            messages.len()
        )));
    }

    let consecutive = messages
        .windows(2)
        .any(|pair| pair[0].role == Role::Assistant && pair[1].role == Role::Assistant);
    if consecutive {
        return Err(ChatError::InvalidRequest(
            "messages must not contain consecutive assistant turns".to_owned(),
        ));
    }

    Ok(())
}

fn error_response(error: &ChatError) -> Response {
    tracing::debug!(error = %error, "chat request rejected");
    (error.status_code(), Json(ErrorResponse::from_error(error))).into_response()
}
