//! `/` service descriptor.

use serde::Serialize;

/// Endpoint map advertised at `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoints {
    /// Liveness probe.
    pub health: &'static str,
    /// Chat Event Stream.
    pub chat: &'static str,
    /// Ingestion stub.
    pub ingest_pptx: &'static str,
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    /// Service name.
    pub service: String,
    /// Crate version.
    pub version: &'static str,
    /// Always `"running"`.
    pub status: &'static str,
    /// Advertised endpoints.
    pub endpoints: Endpoints,
}

impl ServiceInfo {
    /// Descriptor for a service called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            service: name.into(),
            version: env!("CARGO_PKG_VERSION"),
            status: "running",
            endpoints: Endpoints {
                health: "/health",
                chat: "POST /ai/chat",
                ingest_pptx: "POST /ai/ingest/pptx",
            },
        }
    }
}
