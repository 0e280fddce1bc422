//! # Request Trim Core
//!
//! Pure, framework-independent transforms applied to inbound request
//! payloads before business handlers see them.
//!
//! ## Core Concepts
//!
//! - **Trim**: deep copy of a JSON value with every string leaf stripped of
//!   leading/trailing whitespace ([`trim::trim`])
//! - **Payload**: body and query data of one request ([`RequestPayload`])
//! - **Stage**: pure step `payload -> payload` ([`PayloadStage`])
//! - **Pipeline**: ordered composition of stages ([`Pipeline`])
//! - **Query codec**: URL-encoded text to JSON mapping and back ([`query`])
//!
//! ## Architecture Principles
//!
//! - No I/O, no shared mutable state
//! - Exhaustive matching over [`serde_json::Value`]
//! - Stages never fail; anything they cannot handle passes through
//!
//! ## Example
//!
//! ```
//! use request_trim_core::{Pipeline, RequestPayload, TrimStage};
//! use request_trim_core::query::parse_query;
//! use serde_json::json;
//!
//! let pipeline = Pipeline::new().with_stage(TrimStage::all());
//! let payload = RequestPayload::new(
//!     Some(json!({ "shop_name": "Davidshop01 " })),
//!     Some(parse_query("search=+apples+")),
//! );
//!
//! let out = pipeline.run(payload);
//! assert_eq!(out.body, Some(json!({ "shop_name": "Davidshop01" })));
//! assert_eq!(out.query, Some(json!({ "search": "apples" })));
//! assert_eq!(out.stats.total(), 2);
//! ```

pub mod pipeline;
pub mod query;
pub mod trim;

pub use pipeline::{PayloadStage, PayloadStats, Pipeline, RequestPayload, TrimStage};
pub use trim::{trim, trim_in_place, trim_with_report, TrimReport};

// Re-export so downstream crates agree on the value type.
pub use serde_json::{self, Map, Value};
