//! Axum integration for request payload trimming.
//!
//! This crate wires the pure transforms of `request-trim-core` into an
//! HTTP stack, following the "Functional Core, Imperative Shell" split.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← body buffering, limits
//! │  - Request decoding / re-encoding       │  ← URI rebuilding
//! │  - Response serialization               │  ← logging
//! ├─────────────────────────────────────────┤
//! │         Functional Core                 │
//! │  - trim(&Value) -> Value                │  ← pure, total
//! │  - Pipeline of PayloadStages            │  ← payload in, payload out
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at the trimming layer
//! 2. **Decode** JSON/form body and query string
//! 3. **Run** the payload pipeline
//! 4. **Rebuild** the request with trimmed body, query and `Content-Length`
//! 5. **Forward** to the router; handlers see trimmed values only
//!
//! # Example
//!
//! ```ignore
//! use axum::{routing::post, Json, Router};
//! use request_trim_web::{trim_fields_layer, TrimConfig};
//!
//! async fn create_shop(Json(shop): Json<NewShop>) -> StatusCode {
//!     // shop.name has no leading/trailing whitespace here
//!     StatusCode::CREATED
//! }
//!
//! let app = Router::new()
//!     .route("/api/shops", post(create_shop))
//!     .layer(trim_fields_layer(TrimConfig::default()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;

// Re-export key types for convenience
pub use config::{Config, ConfigError, ServerConfig, TrimConfig};
pub use error::AppError;
pub use extractors::TrimSummary;
pub use middleware::{trim_fields_layer, TrimFieldsLayer, TrimFieldsMiddleware};
pub use router::build_router;
