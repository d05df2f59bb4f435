//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`ServiceSettings::default()`]
//! 2. If `~/.agent-service/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//! 4. Validate
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::ServiceSettings;

/// Bind address override.
pub const ENV_HOST: &str = "AGENT_HOST";
/// Bind port override.
pub const ENV_PORT: &str = "AGENT_PORT";
/// Comma-separated CORS origins override.
pub const ENV_CORS_ORIGINS: &str = "AGENT_CORS_ORIGINS";
/// Upload size limit override, in bytes.
pub const ENV_MAX_UPLOAD_BYTES: &str = "AGENT_MAX_UPLOAD_BYTES";
/// Chat fragment delay override, in milliseconds.
pub const ENV_CHAT_DELAY_MS: &str = "AGENT_CHAT_DELAY_MS";
/// Log filter override.
pub const ENV_LOG_LEVEL: &str = "AGENT_LOG_LEVEL";

/// Resolve the path to the settings file (`~/.agent-service/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".agent-service").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<ServiceSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON or the result fails validation, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<ServiceSettings> {
    let mut settings = load_file_layer(path)?;
    apply_overrides(&mut settings, |name| std::env::var(name).ok());
    settings.validate()?;
    Ok(settings)
}

/// Defaults deep-merged with the file at `path`, without env overrides.
pub fn load_file_layer(path: &Path) -> Result<ServiceSettings> {
    let defaults = serde_json::to_value(ServiceSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply overrides read through `lookup` (normally the process environment).
///
/// Invalid values are ignored with a warning and the file/default value is kept.
pub fn apply_overrides(settings: &mut ServiceSettings, lookup: impl Fn(&str) -> Option<String>) {
    let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = read(ENV_HOST) {
        settings.server.host = v;
    }
    if let Some(v) = read(ENV_PORT) {
        match parse_u16_range(&v, 1, 65535) {
            Some(port) => settings.server.port = port,
            None => warn!(key = ENV_PORT, value = %v, "invalid port env var, ignoring"),
        }
    }
    if let Some(v) = read(ENV_CORS_ORIGINS) {
        let origins = parse_list(&v);
        if origins.is_empty() {
            warn!(key = ENV_CORS_ORIGINS, value = %v, "empty origin list, ignoring");
        } else {
            settings.server.cors_origins = origins;
        }
    }
    if let Some(v) = read(ENV_MAX_UPLOAD_BYTES) {
        match parse_usize_range(&v, 1024, 1 << 30) {
            Some(n) => settings.server.max_upload_bytes = n,
            None => warn!(key = ENV_MAX_UPLOAD_BYTES, value = %v, "invalid upload limit env var, ignoring"),
        }
    }
    if let Some(v) = read(ENV_CHAT_DELAY_MS) {
        match parse_u64_range(&v, 0, 60_000) {
            Some(ms) => settings.chat.fragment_delay_ms = ms,
            None => warn!(key = ENV_CHAT_DELAY_MS, value = %v, "invalid delay env var, ignoring"),
        }
    }
    if let Some(v) = read(ENV_LOG_LEVEL) {
        settings.logging.level = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn parse_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
