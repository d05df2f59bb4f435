//! Streaming response emitter.
//!
//! Wraps producer fragments into indexed [`ChatEvent::Content`] records and
//! terminates every stream with exactly one [`ChatEvent::Done`].

use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::events::ChatEvent;
use crate::producer::{ChatProducer, ChatRequest};

/// Lazy, finite stream of chat events.
pub type ChatEventStream = Pin<Box<dyn Stream<Item = ChatEvent> + Send>>;

/// Start a chat Event Stream for `request`.
///
/// Nothing runs until the stream is polled. Dropping it stops the producer:
/// no further fragments are pulled and no pending pause is awaited.
///
/// Empty fragments are skipped without consuming an index. A producer
/// failure, at start or mid-stream, becomes a single `Error` event; `Done`
/// always follows.
pub fn start_stream(producer: Arc<dyn ChatProducer>, request: ChatRequest) -> ChatEventStream {
    Box::pin(async_stream::stream! {
        let mut index = 0usize;
        match producer.produce(&request).await {
            Ok(mut fragments) => {
                while let Some(item) = fragments.next().await {
                    match item {
                        Ok(text) if text.is_empty() => {}
                        Ok(text) => {
                            yield ChatEvent::content(text, index);
                            index += 1;
                        }
                        Err(error) => {
                            warn!(
                                producer = producer.name(),
                                kind = error.error_kind(),
                                emitted = index,
                                "chat producer failed mid-stream: {error}"
                            );
                            yield ChatEvent::error(error.to_string());
                            break;
                        }
                    }
                }
            }
            Err(error) => {
                warn!(
                    producer = producer.name(),
                    kind = error.error_kind(),
                    "chat producer failed to start: {error}"
                );
                yield ChatEvent::error(error.to_string());
            }
        }
        debug!(producer = producer.name(), emitted = index, "chat stream finished");
        yield ChatEvent::Done;
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;
    use crate::errors::ProducerError;
    use crate::producer::{CannedProducer, FragmentStream};

    fn canned(fragments: &[&str], delay_ms: u64) -> Arc<dyn ChatProducer> {
        Arc::new(CannedProducer::new(
            fragments.iter().map(ToString::to_string).collect(),
            Duration::from_millis(delay_ms),
        ))
    }

    /// Replays scripted fragment results, counting how many were pulled.
    struct ScriptedProducer {
        script: Vec<Result<String, ProducerError>>,
        pulled: Arc<AtomicUsize>,
        delay: Duration,
    }

    #[async_trait]
    impl ChatProducer for ScriptedProducer {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn produce(&self, _request: &ChatRequest) -> Result<FragmentStream, ProducerError> {
            let script = self.script.clone();
            let pulled = Arc::clone(&self.pulled);
            let delay = self.delay;
            Ok(Box::pin(async_stream::stream! {
                for item in script {
                    let _ = pulled.fetch_add(1, Ordering::SeqCst);
                    yield item;
                    tokio::time::sleep(delay).await;
                }
            }))
        }
    }

    struct UnavailableProducer;

    #[async_trait]
    impl ChatProducer for UnavailableProducer {
        fn name(&self) -> &str {
            "unavailable"
        }

        async fn produce(&self, _request: &ChatRequest) -> Result<FragmentStream, ProducerError> {
            Err(ProducerError::Unavailable("backend offline".into()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reference_stream_has_six_indexed_contents_then_done() {
        let producer: Arc<dyn ChatProducer> = Arc::new(CannedProducer::default());
        let start = Instant::now();
        let events: Vec<ChatEvent> = start_stream(producer, ChatRequest::default()).collect().await;

        assert_eq!(events.len(), 7);
        for (i, event) in events[..6].iter().enumerate() {
            match event {
                ChatEvent::Content { content, index } => {
                    assert_eq!(*index, i);
                    assert!(!content.is_empty());
                }
                other => panic!("expected content, got {other:?}"),
            }
        }
        assert_eq!(events[6], ChatEvent::Done);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn one_pause_between_each_pair_of_events() {
        let mut stream = start_stream(canned(&["a", "b", "c"], 500), ChatRequest::default());
        let mut stamps = Vec::new();
        while let Some(event) = stream.next().await {
            stamps.push((Instant::now(), event));
        }

        assert_eq!(stamps.len(), 4);
        for pair in stamps.windows(2) {
            assert_eq!(pair[1].0 - pair[0].0, Duration::from_millis(500));
        }
        assert_eq!(stamps.last().unwrap().1, ChatEvent::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_follows_done() {
        let mut stream = start_stream(canned(&["a"], 10), ChatRequest::default());
        assert_eq!(stream.next().await, Some(ChatEvent::content("a", 0)));
        assert_eq!(stream.next().await, Some(ChatEvent::Done));
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_fragment_list_yields_only_done() {
        let events: Vec<_> = start_stream(canned(&[], 500), ChatRequest::default()).collect().await;
        assert_eq!(events, vec![ChatEvent::Done]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_fragments_do_not_consume_indices() {
        let events: Vec<_> = start_stream(canned(&["a", "", "b"], 1), ChatRequest::default())
            .collect()
            .await;
        assert_eq!(
            events,
            vec![ChatEvent::content("a", 0), ChatEvent::content("b", 1), ChatEvent::Done]
        );
    }

    #[tokio::test]
    async fn start_failure_yields_error_then_done() {
        let events: Vec<_> = start_stream(Arc::new(UnavailableProducer), ChatRequest::default())
            .collect()
            .await;
        assert_eq!(
            events,
            vec![
                ChatEvent::error("producer unavailable: backend offline"),
                ChatEvent::Done
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn mid_stream_failure_stops_production() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let producer = Arc::new(ScriptedProducer {
            script: vec![
                Ok("first".into()),
                Err(ProducerError::Generation("lost connection".into())),
                Ok("never".into()),
            ],
            pulled: Arc::clone(&pulled),
            delay: Duration::from_millis(100),
        });

        let events: Vec<_> = start_stream(producer, ChatRequest::default()).collect().await;
        assert_eq!(
            events,
            vec![
                ChatEvent::content("first", 0),
                ChatEvent::error("generation failed: lost connection"),
                ChatEvent::Done
            ]
        );
        assert_eq!(pulled.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_stream_stops_remaining_emissions() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let producer = Arc::new(ScriptedProducer {
            script: (0..6).map(|i| Ok(format!("part {i}"))).collect(),
            pulled: Arc::clone(&pulled),
            delay: Duration::from_millis(500),
        });

        let mut stream = start_stream(producer, ChatRequest::default());
        let _ = stream.next().await;
        let _ = stream.next().await;
        drop(stream);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(pulled.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_streams_interleave_on_one_runtime() {
        let producer: Arc<dyn ChatProducer> = Arc::new(CannedProducer::default());
        let start = Instant::now();
        let (a, b) = tokio::join!(
            start_stream(Arc::clone(&producer), ChatRequest::default()).collect::<Vec<_>>(),
            start_stream(producer, ChatRequest::default()).collect::<Vec<_>>(),
        );
        assert_eq!(a, b);
        assert_eq!(a.len(), 7);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn request_payload_does_not_change_canned_output() {
        let producer: Arc<dyn ChatProducer> = Arc::new(CannedProducer::default());
        let with_message: ChatRequest =
            serde_json::from_value(serde_json::json!({"message": "anything"})).unwrap();
        let a: Vec<_> = start_stream(Arc::clone(&producer), with_message).collect().await;
        let b: Vec<_> = start_stream(producer, ChatRequest::default()).collect().await;
        assert_eq!(a, b);
    }
}
