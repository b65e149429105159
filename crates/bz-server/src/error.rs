//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`bz_core::Error`] so that route handlers
//! can return `Result<T, AppError>` and use `?` on core calls.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Body text for every 5xx response; the real cause only goes to the log.
const INTERNAL_MESSAGE: &str = "internal server error";

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: bz_core::Error,
}

impl AppError {
    pub fn new(inner: bz_core::Error) -> Self {
        Self { inner }
    }
}

impl From<bz_core::Error> for AppError {
    fn from(e: bz_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
            INTERNAL_MESSAGE.to_string()
        } else {
            tracing::warn!(status = %status, error = %self.inner, "Rejected request");
            self.inner.to_string()
        };

        let body = json!({
            "error": message,
            "code": self.inner.code(),
        });

        (status, axum::Json(body)).into_response()
    }
}
