use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

use super::models::ErrorResponse;
use crate::engine::ResolveError;
use crate::handlers::{DispatchError, RegistryError, Stage};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("payload invalid: {0}")]
    InvalidPayload(String),
    #[error("payload too large: {0} bytes")]
    PayloadTooLarge(usize),
    #[error("unknown addon: {0}")]
    UnknownAddon(String),
    #[error("addon has no handler for stage '{0}'")]
    UnhandledStage(Stage),
    #[error("stage handler failed: {0}")]
    Upstream(String),
    #[error("resolution failed: {0}")]
    ResolutionFailed(String),
    #[error("request cancelled")]
    Cancelled,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnknownAddon(_) => StatusCode::NOT_FOUND,
            ApiError::UnhandledStage(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::ResolutionFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidPayload(_) => "INVALID_PAYLOAD",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::UnknownAddon(_) => "UNKNOWN_ADDON",
            ApiError::UnhandledStage(_) => "UNHANDLED_STAGE",
            ApiError::Upstream(_) => "UPSTREAM_FAILED",
            ApiError::ResolutionFailed(_) => "RESOLUTION_FAILED",
            ApiError::Cancelled => "CANCELLED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        };

        (status, Json(json!(body))).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::InvalidPayload(value.to_string())
    }
}

impl From<DispatchError> for ApiError {
    fn from(value: DispatchError) -> Self {
        match value {
            DispatchError::Registry(RegistryError::UnhandledStage(stage)) => {
                ApiError::UnhandledStage(stage)
            }
            DispatchError::Registry(err) => ApiError::Internal(err.to_string()),
            DispatchError::Handler(err) => ApiError::Upstream(err.to_string()),
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(value: ResolveError) -> Self {
        match value {
            ResolveError::Cancelled => ApiError::Cancelled,
            err => ApiError::ResolutionFailed(err.to_string()),
        }
    }
}
