//! Error responses produced by the trimming layer and the demo handlers.
//!
//! Every rejection is a client error rendered as
//! `{ "code": "<CODE>", "message": "<text>" }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

/// A request the layer or a handler refused to process.
///
/// # Examples
///
/// ```ignore
/// async fn handler(body: Bytes) -> Result<Json<Value>, AppError> {
///     let value = serde_json::from_slice(&body)
///         .map_err(|e| AppError::bad_request(e.to_string()))?;
///     Ok(Json(value))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    /// Shown to the client.
    message: String,
    /// Stable identifier clients can match on.
    code: &'static str,
}

impl AppError {
    fn new(status: StatusCode, code: &'static str, message: String) -> Self {
        Self {
            status,
            message,
            code,
        }
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message.into())
    }

    /// Create a 404 Not Found error for an unrouted path.
    #[must_use]
    pub fn not_found(path: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("No route for {path}"),
        )
    }

    /// Create a 413 Payload Too Large error.
    #[must_use]
    pub fn payload_too_large(limit: usize) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "PAYLOAD_TOO_LARGE",
            format!("Request body exceeds the {limit} byte limit"),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::debug!(
            status = %self.status,
            code = self.code,
            message = %self.message,
            "Rejecting request"
        );

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    async fn rendered(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[tokio::test]
    async fn test_not_found() {
        let (status, body) = rendered(AppError::not_found("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({ "code": "NOT_FOUND", "message": "No route for /nope" })
        );
    }

    #[tokio::test]
    async fn test_payload_too_large() {
        let (status, body) = rendered(AppError::payload_too_large(16)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            body,
            json!({
                "code": "PAYLOAD_TOO_LARGE",
                "message": "Request body exceeds the 16 byte limit"
            })
        );
    }

    #[tokio::test]
    async fn test_bad_request_body_shape() {
        let (status, body) = rendered(AppError::bad_request("nope")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "code": "BAD_REQUEST", "message": "nope" }));
    }
}
