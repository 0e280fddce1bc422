//! Echo endpoint.
//!
//! Reflects the request payload exactly as downstream handlers see it, so
//! the effect of the trimming layer can be inspected over HTTP.

use crate::error::AppError;
use crate::extractors::TrimSummary;
use crate::middleware::BodyKind;
use axum::{body::Bytes, extract::RawQuery, http::HeaderMap, Json};
use request_trim_core::{
    query::{parse_form, parse_query},
    Value,
};
use serde::Serialize;

/// Response body of the echo endpoint.
#[derive(Debug, Serialize)]
pub struct EchoResponse {
    /// Decoded request body, `null` when empty.
    pub body: Value,
    /// Decoded query parameters (empty mapping when absent).
    pub query: Value,
    /// What the trimming layer changed.
    pub trimmed: TrimSummary,
}

/// Echo the decoded body and query back as JSON.
///
/// # Endpoint
///
/// ```text
/// GET|POST /echo
/// ```
///
/// # Response
///
/// ```json
/// {
///   "body": { "name": "Alice" },
///   "query": { "page": "2" },
///   "trimmed": { "body_fields": 1, "query_fields": 1 }
/// }
/// ```
///
/// # Errors
///
/// Returns `400 Bad Request` when a JSON body does not parse.
#[allow(clippy::unused_async)]
pub async fn echo(
    trimmed: TrimSummary,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<EchoResponse>, AppError> {
    let is_form = BodyKind::from_headers(&headers) == Some(BodyKind::Form);

    let body = if body.is_empty() {
        Value::Null
    } else if is_form {
        parse_form(&body)
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {e}")))?
    };

    Ok(Json(EchoResponse {
        body,
        query: parse_query(query.as_deref().unwrap_or_default()),
        trimmed,
    }))
}
