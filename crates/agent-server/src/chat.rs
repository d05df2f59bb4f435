//! `POST /ai/chat`: chat Event Stream over HTTP.

use std::sync::Arc;
use std::time::Instant;

use agent_core::sse::{self, encode_record};
use agent_core::{ChatEvent, ChatRequest, start_stream};
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderName, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use futures::StreamExt;
use metrics::{counter, gauge};
use tracing::{debug, info};

use crate::metrics::{
    CHAT_EVENTS_TOTAL, CHAT_STREAMS_ABANDONED_TOTAL, CHAT_STREAMS_ACTIVE, CHAT_STREAMS_TOTAL,
};
use crate::server::AppState;

/// Disables proxy buffering (nginx) so records reach the client promptly.
pub const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// Open a chat Event Stream. The request body must be a JSON object.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let producer = Arc::clone(&state.producer);
    let mut tracker = StreamTracker::open(producer.name(), request.message().is_some());

    let body = start_stream(producer, request).map(move |event| {
        tracker.record(&event);
        encode_record(&event).map(Bytes::from)
    });

    (
        [
            (header::CONTENT_TYPE, sse::CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
            (X_ACCEL_BUFFERING, "no"),
        ],
        Body::from_stream(body),
    )
        .into_response()
}

/// Per-stream bookkeeping, owned by the response body.
///
/// Dropped together with the body, either after `done` was written or when
/// the client went away first.
struct StreamTracker {
    producer: String,
    opened: Instant,
    events: usize,
    finished: bool,
}

impl StreamTracker {
    fn open(producer: &str, has_message: bool) -> Self {
        counter!(CHAT_STREAMS_TOTAL).increment(1);
        gauge!(CHAT_STREAMS_ACTIVE).increment(1.0);
        info!(producer, has_message, "chat stream opened");
        Self {
            producer: producer.to_string(),
            opened: Instant::now(),
            events: 0,
            finished: false,
        }
    }

    fn record(&mut self, event: &ChatEvent) {
        self.events += 1;
        self.finished = event.is_terminal();
        counter!(CHAT_EVENTS_TOTAL, "type" => event.kind()).increment(1);
    }
}

impl Drop for StreamTracker {
    fn drop(&mut self) {
        gauge!(CHAT_STREAMS_ACTIVE).decrement(1.0);
        let elapsed_ms = self.opened.elapsed().as_millis();
        if self.finished {
            info!(
                producer = %self.producer,
                events = self.events,
                elapsed_ms = %elapsed_ms,
                "chat stream completed"
            );
        } else {
            counter!(CHAT_STREAMS_ABANDONED_TOTAL).increment(1);
            debug!(
                producer = %self.producer,
                events = self.events,
                elapsed_ms = %elapsed_ms,
                "chat stream dropped before done"
            );
        }
    }
}
