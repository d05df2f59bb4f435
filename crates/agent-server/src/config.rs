//! Server configuration.

use std::time::Duration;

use agent_settings::ServerSettings;
use serde::{Deserialize, Serialize};

/// Configuration for the HTTP server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
    /// Allowed CORS origins; `"*"` mirrors any origin.
    pub cors_origins: Vec<String>,
    /// Request body limit for JSON and multipart extractors, in bytes.
    pub max_upload_bytes: usize,
    /// Grace period for in-flight requests after shutdown starts.
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: vec!["*".into()],
            max_upload_bytes: 50 * 1024 * 1024, // 50 MB
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            cors_origins: settings.cors_origins.clone(),
            max_upload_bytes: settings.max_upload_bytes,
            shutdown_timeout: settings.shutdown_timeout(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
