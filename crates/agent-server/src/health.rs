//! `/health` endpoint.

use serde::Serialize;

/// Health check response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server is running.
    pub status: &'static str,
}

/// Liveness: answering at all means healthy.
pub fn health_check() -> HealthResponse {
    HealthResponse { status: "ok" }
}
