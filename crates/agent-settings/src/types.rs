//! Settings types.
//!
//! All structs serialize as camelCase and fill missing fields from
//! `Default`, so a partial settings file is always valid input.

use std::time::Duration;

use agent_core::producer::{DEFAULT_FRAGMENT_DELAY, REFERENCE_FRAGMENTS};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings for the service.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceSettings {
    /// Service name reported at `/`.
    pub name: String,
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Chat stream settings.
    pub chat: ChatSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "AI Agent Service".to_string(),
            server: ServerSettings::default(),
            chat: ChatSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl ServiceSettings {
    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.server.cors_origins.is_empty() {
            return Err(SettingsError::InvalidValue(
                "server.corsOrigins must not be empty".into(),
            ));
        }
        if self.chat.fragments.is_empty() {
            return Err(SettingsError::InvalidValue(
                "chat.fragments must not be empty".into(),
            ));
        }
        if let Some(pos) = self.chat.fragments.iter().position(String::is_empty) {
            return Err(SettingsError::InvalidValue(format!(
                "chat.fragments[{pos}] is empty"
            )));
        }
        Ok(())
    }
}

/// HTTP server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Allowed CORS origins. `"*"` allows any origin.
    pub cors_origins: Vec<String>,
    /// Maximum request body size for uploads, in bytes.
    pub max_upload_bytes: usize,
    /// How long in-flight requests may run after shutdown starts.
    pub shutdown_timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            max_upload_bytes: 50 * 1024 * 1024,
            shutdown_timeout_ms: 30_000,
        }
    }
}

impl ServerSettings {
    /// Shutdown timeout as a [`Duration`].
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

/// Chat stream settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatSettings {
    /// Pause after each canned fragment, in milliseconds.
    pub fragment_delay_ms: u64,
    /// Canned fragments, in emission order.
    pub fragments: Vec<String>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            fragment_delay_ms: u64::try_from(DEFAULT_FRAGMENT_DELAY.as_millis()).unwrap_or(500),
            fragments: REFERENCE_FRAGMENTS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ChatSettings {
    /// Fragment delay as a [`Duration`].
    pub fn fragment_delay(&self) -> Duration {
        Duration::from_millis(self.fragment_delay_ms)
    }
}

/// Logging settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. `"info"` or `"info,agent_server=debug"`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
