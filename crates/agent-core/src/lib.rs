//! # agent-core
//!
//! Shared types and logic for the AI agent service.
//!
//! - [`events::ChatEvent`]: the typed records of a chat Event Stream
//! - [`sse`]: `data: <json>\n\n` record framing
//! - [`producer::ChatProducer`]: capability interface for chat output, with
//!   the canned [`producer::CannedProducer`]
//! - [`emitter::start_stream`]: turns producer fragments into an indexed,
//!   `done`-terminated event stream
//! - [`ingest`]: the document ingestion stub
//! - [`logging`]: `tracing` subscriber bootstrap

#![deny(unsafe_code)]

pub mod emitter;
pub mod errors;
pub mod events;
pub mod ingest;
pub mod logging;
pub mod producer;
pub mod sse;

pub use emitter::{ChatEventStream, start_stream};
pub use errors::ProducerError;
pub use events::ChatEvent;
pub use producer::{CannedProducer, ChatProducer, ChatRequest, FragmentStream};
