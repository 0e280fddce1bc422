//! Axum middleware that trims whitespace from request payloads.
//!
//! This module provides a tower layer that runs every inbound request
//! through the payload [`Pipeline`] before the router sees it:
//! - **JSON bodies**: mappings have every string field trimmed
//! - **Form bodies**: `application/x-www-form-urlencoded` values are trimmed
//! - **Query strings**: parameter values are trimmed
//!
//! # Example
//!
//! ```ignore
//! use axum::{routing::post, Router};
//! use request_trim_web::{middleware::trim_fields_layer, TrimConfig};
//!
//! let app = Router::new()
//!     .route("/api/products", post(create_product))
//!     .layer(trim_fields_layer(TrimConfig::default()));
//! ```
//!
//! # Flow
//!
//! 1. **Buffer** the body if it is JSON or form-encoded (up to the limit)
//! 2. **Decode** body and query into JSON values
//! 3. **Run** the payload pipeline
//! 4. **Re-encode** whatever changed and rebuild the request
//! 5. **Record** a [`TrimSummary`] in request extensions
//! 6. **Forward** to the inner service, always
//!
//! Bodies of any other content type are streamed through untouched and are
//! not subject to the limit. A body that cannot be parsed is forwarded
//! byte-for-byte so the handler's own extractor can reject it.
//!
//! A rewritten query string or form body is serialized again from its
//! decoded mapping, so repeated keys end up grouped where the key first
//! appeared and a bare `flag` comes out as `flag=`. Payloads the pipeline
//! left alone keep their original bytes. JSON numbers keep their exact
//! text through a rewrite.

use crate::config::TrimConfig;
use crate::error::AppError;
use crate::extractors::TrimSummary;
use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        request::Parts,
        uri::PathAndQuery,
        HeaderMap, HeaderValue, Uri,
    },
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use request_trim_core::{
    query::{encode_query, parse_form, parse_query},
    Pipeline, RequestPayload, TrimStage, Value,
};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};

/// Create a layer that trims string fields in request bodies and queries.
///
/// The layer never rejects a request on account of its content. The only
/// response it produces itself is `413 Payload Too Large`, when a JSON or
/// form body exceeds [`TrimConfig::body_limit`] and cannot be buffered.
#[must_use]
pub fn trim_fields_layer(config: TrimConfig) -> TrimFieldsLayer {
    let pipeline = Pipeline::new().with_stage(TrimStage::new(config.body, config.query));
    TrimFieldsLayer::with_pipeline(config, pipeline)
}

/// Layer for payload trimming.
#[derive(Clone, Debug)]
pub struct TrimFieldsLayer {
    config: TrimConfig,
    pipeline: Arc<Pipeline>,
}

impl TrimFieldsLayer {
    /// Layer running a custom pipeline instead of the default trim stage.
    ///
    /// `config.body` and `config.query` still decide which payloads are
    /// decoded and handed to the pipeline.
    #[must_use]
    pub fn with_pipeline(config: TrimConfig, pipeline: Pipeline) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }
}

impl<S> Layer<S> for TrimFieldsLayer {
    type Service = TrimFieldsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TrimFieldsMiddleware {
            inner,
            config: self.config,
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

/// Middleware service for payload trimming.
#[derive(Clone, Debug)]
pub struct TrimFieldsMiddleware<S> {
    inner: S,
    config: TrimConfig,
    pipeline: Arc<Pipeline>,
}

impl<S> Service<Request> for TrimFieldsMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        // Keep the service that was polled ready; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let config = self.config;
        let pipeline = Arc::clone(&self.pipeline);

        Box::pin(async move {
            match rewrite_request(req, &config, &pipeline).await {
                Ok(req) => inner.call(req).await,
                Err(err) => Ok(err.into_response()),
            }
        })
    }
}

/// Body encodings the layer knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodyKind {
    Json,
    Form,
}

impl BodyKind {
    /// Classifies a request by its `Content-Type` essence, ignoring case
    /// and parameters.
    pub(crate) fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "application/json"
            || (essence.starts_with("application/") && essence.ends_with("+json"))
        {
            Some(Self::Json)
        } else if essence == "application/x-www-form-urlencoded" {
            Some(Self::Form)
        } else {
            None
        }
    }

    fn decode(self, bytes: &[u8]) -> Option<Value> {
        if bytes.is_empty() {
            return None;
        }
        match self {
            Self::Json => serde_json::from_slice(bytes).ok(),
            Self::Form => Some(parse_form(bytes)),
        }
    }

    fn encode(self, value: &Value) -> Option<Vec<u8>> {
        match self {
            Self::Json => serde_json::to_vec(value).ok(),
            Self::Form => encode_query(value).map(String::into_bytes),
        }
    }
}

/// Runs the pipeline over one request and rebuilds it.
///
/// A slot is re-encoded only when the pipeline output differs from what was
/// decoded, whichever stage made the change. A stage that clears a slot
/// leaves the original bytes in place.
async fn rewrite_request(
    req: Request,
    config: &TrimConfig,
    pipeline: &Pipeline,
) -> Result<Request, AppError> {
    let (mut parts, body) = req.into_parts();
    let query = decode_query(&parts.uri, config);

    let Some(kind) = BodyKind::from_headers(&parts.headers).filter(|_| config.body) else {
        // Not ours to decode: stream it through untouched.
        let payload = pipeline.run(RequestPayload::new(None, query.clone()));
        apply_query(&mut parts, query.as_ref(), payload.query.as_ref());
        record(&mut parts, TrimSummary::from(payload.stats));
        return Ok(axum::http::Request::from_parts(parts, body));
    };

    let raw = buffer_body(&parts.headers, body, config.body_limit).await?;
    let decoded = kind.decode(&raw);
    let payload = pipeline.run(RequestPayload::new(decoded.clone(), query.clone()));

    let body = match payload.body {
        Some(value) if decoded.as_ref() != Some(&value) => match kind.encode(&value) {
            Some(encoded) => {
                parts
                    .headers
                    .insert(CONTENT_LENGTH, HeaderValue::from(encoded.len()));
                Body::from(encoded)
            }
            None => {
                tracing::warn!("Failed to re-encode rewritten body, forwarding original");
                Body::from(raw)
            }
        },
        _ => Body::from(raw),
    };

    apply_query(&mut parts, query.as_ref(), payload.query.as_ref());
    record(&mut parts, TrimSummary::from(payload.stats));

    Ok(axum::http::Request::from_parts(parts, body))
}

/// Buffers the body, enforcing the configured limit.
async fn buffer_body(headers: &HeaderMap, body: Body, limit: usize) -> Result<Bytes, AppError> {
    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok());
    if declared.is_some_and(|len| len > u64::try_from(limit).unwrap_or(u64::MAX)) {
        return Err(AppError::payload_too_large(limit));
    }

    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            Err(AppError::payload_too_large(limit))
        }
        Err(err) => {
            tracing::debug!(error = %err, "Failed to read request body");
            Err(AppError::bad_request("Failed to read request body"))
        }
    }
}

fn decode_query(uri: &Uri, config: &TrimConfig) -> Option<Value> {
    if !config.query {
        return None;
    }
    uri.query().filter(|q| !q.is_empty()).map(parse_query)
}

/// Replaces the URI query with the pipeline's output, if it differs from
/// what was decoded.
fn apply_query(parts: &mut Parts, decoded: Option<&Value>, rewritten: Option<&Value>) {
    let Some(rewritten) = rewritten.filter(|value| Some(*value) != decoded) else {
        return;
    };
    let Some(encoded) = encode_query(rewritten) else {
        return;
    };
    match replace_query(&parts.uri, &encoded) {
        Some(uri) => parts.uri = uri,
        None => tracing::warn!(uri = %parts.uri, "Failed to rebuild URI with rewritten query"),
    }
}

fn replace_query(uri: &Uri, query: &str) -> Option<Uri> {
    let path_and_query = if query.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{query}", uri.path())
    };

    let mut uri_parts = uri.clone().into_parts();
    uri_parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(uri_parts).ok()
}

fn record(parts: &mut Parts, summary: TrimSummary) {
    if summary.total() > 0 {
        tracing::debug!(
            method = %parts.method,
            path = %parts.uri.path(),
            body_fields = summary.body_fields,
            query_fields = summary.query_fields,
            "Trimmed request payload"
        );
    }
    parts.extensions.insert(summary);
}
