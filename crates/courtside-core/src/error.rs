use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failure classes every service error maps onto.
///
/// Services keep their own fine-grained error enums and expose a
/// `class()` so status codes and logging stay uniform across the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed input; surfaced immediately, never retried.
    Validation,
    /// Missing, invalid or expired credentials.
    Unauthenticated,
    /// Authenticated but lacking the capability.
    Forbidden,
    NotFound,
    /// Guard rejected the write (slot taken, duplicate, full).
    Conflict,
    RateLimited,
    Internal,
}

impl ErrorClass {
    pub fn status(self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Render a service error as `{ "kind": ..., "message": ... }` with the
/// status of its class.
///
/// Only `Internal` is logged here: tower-http's TraceLayer already records
/// method/uri/status for every request and 4xx are expected client errors.
pub fn error_response(class: ErrorClass, kind: &'static str, message: String) -> Response {
    if class == ErrorClass::Internal {
        tracing::error!(kind, error = %message, "internal error");
    }
    let body = serde_json::json!({
        "kind": kind,
        "message": if class == ErrorClass::Internal {
            "internal error".to_owned()
        } else {
            message
        },
    });
    (class.status(), axum::Json(body)).into_response()
}
