//! Custom Axum extractors.
//!
//! - `TrimSummary`: what the trimming layer changed in the current request
//!
//! # Examples
//!
//! ```ignore
//! use request_trim_web::extractors::TrimSummary;
//!
//! async fn handler(trimmed: TrimSummary, Json(body): Json<NewProduct>) -> StatusCode {
//!     tracing::info!(
//!         body_fields = trimmed.body_fields,
//!         query_fields = trimmed.query_fields,
//!         "Creating product"
//!     );
//!     StatusCode::CREATED
//! }
//! ```

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use request_trim_core::PayloadStats;
use serde::Serialize;

/// Counts of string fields the trimming layer rewrote.
///
/// The layer stores one of these in the request extensions. Extracting it
/// never fails: without the layer installed the counts are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrimSummary {
    /// Fields rewritten in the request body.
    pub body_fields: usize,
    /// Fields rewritten in the query string.
    pub query_fields: usize,
}

impl TrimSummary {
    /// Total number of rewritten fields.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.body_fields + self.query_fields
    }
}

impl From<PayloadStats> for TrimSummary {
    fn from(stats: PayloadStats) -> Self {
        Self {
            body_fields: stats.body_fields,
            query_fields: stats.query_fields,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TrimSummary
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().copied().unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_summary_from_extensions() {
        let mut req = Request::builder().body(()).expect("Valid request");
        req.extensions_mut().insert(TrimSummary {
            body_fields: 2,
            query_fields: 1,
        });

        let (mut parts, ()) = req.into_parts();
        let summary = TrimSummary::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(summary.body_fields, 2);
        assert_eq!(summary.query_fields, 1);
        assert_eq!(summary.total(), 3);
    }

    #[tokio::test]
    async fn test_summary_defaults_without_layer() {
        let req = Request::builder().body(()).expect("Valid request");

        let (mut parts, ()) = req.into_parts();
        let summary = TrimSummary::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(summary, TrimSummary::default());
    }

    #[test]
    fn test_summary_from_stats() {
        let stats = PayloadStats {
            body_fields: 4,
            query_fields: 0,
        };
        assert_eq!(
            TrimSummary::from(stats),
            TrimSummary {
                body_fields: 4,
                query_fields: 0
            }
        );
    }
}
