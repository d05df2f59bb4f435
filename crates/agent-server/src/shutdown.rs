//! Graceful shutdown coordination via `CancellationToken`.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Signals shutdown to the server loop and bounds how long it may drain.
#[derive(Debug, Default)]
pub struct ShutdownCoordinator {
    token: CancellationToken,
}

impl ShutdownCoordinator {
    /// Create a coordinator that has not been triggered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token cancelled when shutdown starts.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Start shutdown. Idempotent.
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// Whether shutdown has started.
    pub fn is_shutting_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Start shutdown and wait up to `timeout` for `server` to finish.
    ///
    /// Returns `false` if the server task was aborted after the timeout.
    pub async fn drain(&self, server: JoinHandle<()>, timeout: Duration) -> bool {
        self.shutdown();
        info!(?timeout, "draining in-flight requests");

        let abort = server.abort_handle();
        if tokio::time::timeout(timeout, server).await.is_ok() {
            true
        } else {
            warn!("shutdown timed out after {timeout:?}, aborting server task");
            abort.abort();
            false
        }
    }
}
