//! # agent-server
//!
//! Axum HTTP server for the AI agent service.
//!
//! - `GET /health`, `GET /`: liveness probe and service descriptor
//! - `POST /ai/chat`: chat Event Stream (`text/event-stream`)
//! - `POST /ai/ingest/pptx`: document ingestion stub (multipart form)
//! - `GET /metrics`: Prometheus exposition, when a recorder is installed
//! - Graceful shutdown via `CancellationToken`

#![deny(unsafe_code)]

pub mod chat;
pub mod config;
pub mod cors;
pub mod error;
pub mod health;
pub mod info;
pub mod ingest;
pub mod metrics;
pub mod server;
pub mod shutdown;

pub use config::ServerConfig;
pub use server::{AgentServer, AppState};
pub use shutdown::ShutdownCoordinator;
