//! Chat producer capability and the canned implementation.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ProducerError;

/// Stream of raw text fragments from a producer.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, ProducerError>> + Send>>;

/// Fragments returned by [`CannedProducer::default`].
pub const REFERENCE_FRAGMENTS: [&str; 6] = [
    "你好！",
    "我是 AI Agent 助手。",
    "这是一个流式输出的演示。",
    "未来这里将接入真实的 LangChain 和 RAG 系统。",
    "现在你看到的每一段文字都是通过 SSE 逐步推送的。",
    "这证明了流式传输功能已经正常工作。",
];

/// Pause after each canned fragment.
pub const DEFAULT_FRAGMENT_DELAY: Duration = Duration::from_millis(500);

/// Body of a chat request: any JSON object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatRequest(pub Map<String, Value>);

impl ChatRequest {
    /// The `message` field, when present and a string.
    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(Value::as_str)
    }
}

/// Source of chat output.
///
/// Implementations return a lazy stream of fragments. Pacing belongs to the
/// producer: the stream suspends between fragments for as long as the next
/// one takes to become available.
#[async_trait]
pub trait ChatProducer: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Start producing fragments for `request`.
    async fn produce(&self, request: &ChatRequest) -> Result<FragmentStream, ProducerError>;
}

/// Producer that replays a fixed fragment list with a fixed pause after
/// each fragment. Ignores the request.
#[derive(Clone, Debug)]
pub struct CannedProducer {
    fragments: Arc<[String]>,
    delay: Duration,
}

impl CannedProducer {
    /// Create a producer over `fragments`, pausing `delay` after each.
    pub fn new(fragments: Vec<String>, delay: Duration) -> Self {
        Self {
            fragments: fragments.into(),
            delay,
        }
    }

    /// The fragments replayed per request.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Pause after each fragment.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for CannedProducer {
    fn default() -> Self {
        Self::new(
            REFERENCE_FRAGMENTS.iter().map(ToString::to_string).collect(),
            DEFAULT_FRAGMENT_DELAY,
        )
    }
}

#[async_trait]
impl ChatProducer for CannedProducer {
    fn name(&self) -> &str {
        "canned"
    }

    async fn produce(&self, _request: &ChatRequest) -> Result<FragmentStream, ProducerError> {
        let fragments = Arc::clone(&self.fragments);
        let delay = self.delay;
        let stream = async_stream::stream! {
            for fragment in fragments.iter() {
                yield Ok(fragment.clone());
                tokio::time::sleep(delay).await;
            }
        };
        Ok(Box::pin(stream))
    }
}
