//! Chat stream events.

use serde::{Deserialize, Serialize};

/// One record of a chat Event Stream.
///
/// Ordering contract for a single stream:
///
/// `Content { index: 0 } → Content { index: 1 } → … → [Error] → Done`
///
/// Indices start at 0 and increase by one per `Content`. `Done` is emitted
/// exactly once and nothing follows it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A fragment of generated text.
    Content {
        /// Non-empty fragment text.
        content: String,
        /// Zero-based position of this fragment in the stream.
        index: usize,
    },
    /// Generation failed; the stream ends with `Done` right after.
    Error {
        /// Human-readable failure description.
        message: String,
    },
    /// Terminal marker.
    Done,
}

impl ChatEvent {
    /// Build a content event.
    pub fn content(content: impl Into<String>, index: usize) -> Self {
        Self::Content {
            content: content.into(),
            index,
        }
    }

    /// Build an error event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Short tag matching the serialized `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Content { .. } => "content",
            Self::Error { .. } => "error",
            Self::Done => "done",
        }
    }
}
