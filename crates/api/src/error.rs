//! HTTP mapping of application errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use payreport_core::normatives::NormativeError;
use payreport_core::reports::ReportError;
use payreport_shared::AppError;
use serde_json::json;
use tracing::error;

use crate::upstream::UpstreamError;

/// Handler error rendered as a JSON `{error, message}` body.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Missing or malformed request parameter.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// Missing resource.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl From<UpstreamError> for ApiError {
    fn from(e: UpstreamError) -> Self {
        Self(e.into())
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        Self(AppError::Validation(e.to_string()))
    }
}

impl From<NormativeError> for ApiError {
    fn from(e: NormativeError) -> Self {
        Self(AppError::Internal(e.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if status.is_server_error() {
            error!(error = %self.0, "Request failed");
            "Service Error".to_string()
        } else {
            self.0.to_string()
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message
            })),
        )
            .into_response()
    }
}
