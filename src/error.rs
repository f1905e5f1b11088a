// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Every error resolves to the uniform response envelope
/// `{ "success": false, "error": <message>, "details": <optional> }`.
/// Bulk operations attach machine-readable detail (e.g. missing-id lists)
/// so the caller can retry with only the failing subset.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    Validation { message: String, details: Option<Value> },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden - actor lacks role or scope for the action
    Forbidden(String),

    // 404 Not Found - a referenced id does not resolve at all
    NotFound { message: String, details: Option<Value> },

    // 409 Conflict - duplicate unique key (email, course code, campus name, ...)
    Conflict(String),

    // 500 Internal Server Error
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound { message, .. } => message,
            ApiError::Conflict(msg) => msg,
            ApiError::Internal(msg) => msg,
        }
    }

    fn details(&self) -> Option<&Value> {
        match self {
            ApiError::Validation { details, .. } => details.as_ref(),
            ApiError::NotFound { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Convert to the JSON error envelope.
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.message(),
        });
        if let Some(details) = self.details() {
            body["details"] = details.clone();
        }
        body
    }
}

// Static constructors, mirroring the call sites' reading order
impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation { message: message.into(), details: None }
    }

    pub fn validation_with(message: impl Into<String>, details: Value) -> Self {
        ApiError::Validation { message: message.into(), details: Some(details) }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound { message: message.into(), details: None }
    }

    pub fn not_found_with(message: impl Into<String>, details: Value) -> Self {
        ApiError::NotFound { message: message.into(), details: Some(details) }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        // Log the real error but return a generic message; storage internals
        // must not leak to clients.
        tracing::error!("store error: {}", err);
        ApiError::internal("An error occurred while processing your request")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
