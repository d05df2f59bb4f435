//! CORS policy.

use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::warn;

/// Wildcard origin entry.
pub const ANY_ORIGIN: &str = "*";

/// Build the CORS layer for `origins`.
///
/// A `"*"` entry mirrors the request origin, so credentials stay allowed.
/// Otherwise only the listed origins are allowed; entries that are not
/// valid header values are dropped with a warning. Methods and headers
/// mirror the preflight request.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    if origins.iter().any(|o| o == ANY_ORIGIN) {
        return layer.allow_origin(AllowOrigin::mirror_request());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
