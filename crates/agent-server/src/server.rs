//! `AgentServer`: Axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use agent_core::ChatProducer;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::health::{self, HealthResponse};
use crate::info::ServiceInfo;
use crate::shutdown::ShutdownCoordinator;
use crate::{chat, cors, ingest};

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Source of chat output.
    pub producer: Arc<dyn ChatProducer>,
    /// Descriptor served at `/`.
    pub info: Arc<ServiceInfo>,
    /// Prometheus handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

/// The HTTP server.
pub struct AgentServer {
    config: ServerConfig,
    state: AppState,
    shutdown: Arc<ShutdownCoordinator>,
}

impl AgentServer {
    /// Create a server answering chat requests with `producer`.
    pub fn new(
        config: ServerConfig,
        producer: Arc<dyn ChatProducer>,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            config,
            state: AppState {
                producer,
                info: Arc::new(ServiceInfo::new(service_name)),
                metrics: None,
            },
            shutdown: Arc::new(ShutdownCoordinator::new()),
        }
    }

    /// Serve `/metrics` from `handle`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.state.metrics = Some(handle);
        self
    }

    /// Build the Axum router with all routes and layers.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/", get(info_handler))
            .route("/health", get(health_handler))
            .route("/ai/chat", post(chat::chat_handler))
            .route("/ai/ingest/pptx", post(ingest::ingest_handler));
        if self.state.metrics.is_some() {
            router = router.route("/metrics", get(metrics_handler));
        }

        router
            .with_state(self.state.clone())
            .layer(DefaultBodyLimit::max(self.config.max_upload_bytes))
            .layer(cors::cors_layer(&self.config.cors_origins))
            .layer(TraceLayer::new_for_http())
    }

    /// Bind and serve in a background task until shutdown is signalled.
    ///
    /// Returns the bound address (useful with port `0`) and the server task.
    pub async fn listen(&self) -> Result<(SocketAddr, JoinHandle<()>), std::io::Error> {
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr()).await?;
        let addr = listener.local_addr()?;
        let router = self.router();
        let token = self.shutdown.token();

        let handle = tokio::spawn(async move {
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await;
            if let Err(e) = served {
                error!(error = %e, "server terminated with error");
            }
            info!("server stopped");
        });

        info!(%addr, producer = self.state.producer.name(), "agent server listening");
        Ok((addr, handle))
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// GET /
async fn info_handler(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(state.info.as_ref().clone())
}

/// GET /health
async fn health_handler() -> Json<HealthResponse> {
    Json(health::health_check())
}

/// GET /metrics
async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
