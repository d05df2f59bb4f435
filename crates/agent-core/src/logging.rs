//! Structured logging with `tracing`.
//!
//! Log output goes to stderr in compact form. `RUST_LOG` takes precedence
//! over the configured level.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor a configured level is usable.
pub const DEFAULT_LEVEL: &str = "info";

/// Build the filter for `level`, honouring `RUST_LOG` when set.
///
/// Falls back to [`DEFAULT_LEVEL`] when `level` is not a valid directive.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(level))
}

/// Filter for a configured `level`, ignoring the environment.
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Initialize the global tracing subscriber with stderr output.
///
/// Call once at application startup. Subsequent calls are no-ops.
pub fn init_subscriber(level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // set_global_default is a no-op if already set
    let _ = subscriber.try_init();
}
