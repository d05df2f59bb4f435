//! Prometheus metrics recorder and metric names.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Install the Prometheus metrics recorder (global).
///
/// Returns the handle used to render `/metrics`. Call once at startup;
/// until then every metric update is a no-op.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("prometheus metrics recorder installed");
    Ok(handle)
}

// Metric name constants to avoid typos across modules.

/// Chat streams opened (counter).
pub const CHAT_STREAMS_TOTAL: &str = "chat_streams_total";
/// Chat streams currently open (gauge).
pub const CHAT_STREAMS_ACTIVE: &str = "chat_streams_active";
/// Chat events written (counter, labels: type).
pub const CHAT_EVENTS_TOTAL: &str = "chat_events_total";
/// Chat streams dropped before `done` (counter).
pub const CHAT_STREAMS_ABANDONED_TOTAL: &str = "chat_streams_abandoned_total";
/// Ingest requests (counter, labels: status).
pub const INGEST_REQUESTS_TOTAL: &str = "ingest_requests_total";
