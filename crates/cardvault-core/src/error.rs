use axum::{BoxError, Json};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// JSON error body shared by every service: `{ "kind": ..., "error": ... }`.
pub fn error_body(kind: &str, message: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "kind": kind,
        "error": message,
    }))
}

/// Routing-level errors raised before any service handler runs.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("request timed out")]
    Timeout,
    #[error("internal error")]
    Internal,
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::Timeout => "REQUEST_TIMEOUT",
            Self::Internal => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, error_body(self.kind(), &self.to_string())).into_response()
    }
}

/// Router fallback for unknown paths.
pub async fn not_found() -> AppError {
    AppError::NotFound
}

/// Router fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Render errors from fallible middleware. Only the request timeout is expected.
pub async fn handle_layer_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("request timed out");
        AppError::Timeout
    } else {
        tracing::error!(error = %err, "middleware error");
        AppError::Internal
    }
}
