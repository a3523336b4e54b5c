use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use service::errors::ServiceError;
use service::shop::errors::ShopOperationError;

/// JSON error body: `{success: false, error, errMsg}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, message }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(message.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = self.error, message = ?self.message, "request failed");
        }
        let err_msg = self.message.unwrap_or_else(|| self.error.to_string());
        (self.status, Json(serde_json::json!({"success": false, "error": self.error, "errMsg": err_msg}))).into_response()
    }
}

impl From<ShopOperationError> for JsonApiError {
    fn from(e: ShopOperationError) -> Self {
        let status = match e {
            ShopOperationError::Validation(_) => StatusCode::BAD_REQUEST,
            ShopOperationError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let error = match status {
            StatusCode::BAD_REQUEST => "Validation Error",
            StatusCode::NOT_FOUND => "Not Found",
            _ => "Shop Operation Failed",
        };
        Self::new(status, error, Some(format!("{} (code {})", e, e.code())))
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
