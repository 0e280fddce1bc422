//! Router configuration for the demonstration server.
//!
//! Builds the Axum router with all endpoints and the trimming layer.

use crate::config::TrimConfig;
use crate::error::AppError;
use crate::handlers::{echo, health_check};
use crate::middleware::trim_fields_layer;
use axum::{extract::DefaultBodyLimit, http::Uri, routing::get, Router};
use tower_http::trace::TraceLayer;

/// Build the Axum router.
///
/// Configures:
/// - `GET /health`: liveness probe
/// - `GET|POST /echo`: reflects the trimmed payload
/// - a JSON `404` for every other path
///
/// Every request passes through the trimming layer, which itself sits
/// inside the HTTP trace layer. Body extractors share the trimming
/// layer's `body_limit` instead of axum's 2 MB default.
#[must_use]
pub fn build_router(config: TrimConfig) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/echo", get(echo).post(echo))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(trim_fields_layer(config))
        .layer(TraceLayer::new_for_http())
}

#[allow(clippy::unused_async)]
async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(uri.path())
}
