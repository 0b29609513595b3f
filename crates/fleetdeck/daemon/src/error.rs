//! Error types for fleetdeck-daemon

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fleetdeck_provider::ProviderError;
use fleetdeck_reconcile::ReconcileError;
use fleetdeck_registry::RegistryError;
use fleetdeck_scanner::ScanError;
use serde::Serialize;
use thiserror::Error;

use crate::pages::PageError;

/// API-facing errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Conflict (duplicate registration, busy instance)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Credential rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Admin-only operation attempted without the admin token
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Upstream provider or model failure
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Feature is not configured on this deployment
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) => ApiError::NotFound(id.to_string()),
            RegistryError::DuplicateId(id) => {
                ApiError::Conflict(format!("instance with remote id {} already exists", id))
            }
            RegistryError::Invalid(msg) => ApiError::BadRequest(msg),
            RegistryError::Provider(err) => err.into(),
            RegistryError::Storage(msg) | RegistryError::Serialization(msg) => {
                ApiError::Internal(msg)
            }
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Auth(msg) => ApiError::Unauthorized(msg),
            ProviderError::NotFound(msg) => ApiError::NotFound(msg),
            ProviderError::RemoteUnavailable(msg) | ProviderError::Protocol(msg) => {
                ApiError::Upstream(msg)
            }
            ProviderError::Config(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Auth(inner) => ApiError::Unauthorized(inner.to_string()),
            ReconcileError::Request(inner) => ApiError::Upstream(inner.to_string()),
            ReconcileError::Busy(id) => {
                ApiError::Conflict(format!("a power transition is already in progress for {}", id))
            }
            ReconcileError::Registry(inner) => inner.into(),
        }
    }
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Auth(msg) => ApiError::Unauthorized(msg),
            ScanError::Transport(msg) | ScanError::Malformed(msg) => ApiError::Upstream(msg),
            ScanError::Io(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        match err {
            PageError::InvalidPath(msg) => ApiError::BadRequest(msg),
            PageError::NotFound(path) => ApiError::NotFound(path),
            PageError::Io(err) => ApiError::Internal(err.to_string()),
        }
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdeck_types::{InstanceId, RemoteInstanceId};

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::NotFound("x".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::BadRequest("x".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("x".to_string()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Upstream("x".to_string()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_registry_error_mapping() {
        let err: ApiError = RegistryError::DuplicateId(RemoteInstanceId::new("gpu-1")).into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

        let err: ApiError = RegistryError::NotFound(InstanceId::generate()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_busy_maps_to_conflict() {
        let err: ApiError = ReconcileError::Busy(RemoteInstanceId::new("gpu-1")).into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_auth_maps_to_unauthorized() {
        let err: ApiError =
            ReconcileError::Auth(ProviderError::Auth("expired".to_string())).into();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
