//! Error types for the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use festfriend_protocol::ServiceError;
use thiserror::Error;

use super::wire::ErrorBody;

/// Errors returned by the group endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A core operation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The body could not be parsed into the expected JSON shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The body exceeded the configured limit.
    #[error("payload too large")]
    PayloadTooLarge,

    /// The blocking worker running the operation died.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    ///
    /// - NotFound: 404, Unauthorized: 401, Conflict: 409
    /// - RegistryFull: 503 Service Unavailable
    /// - Invalid payload: 422 Unprocessable Entity
    /// - Credential backend, id collision, worker failure: 500
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Service(e) => match e {
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
                ServiceError::Conflict { .. } => StatusCode::CONFLICT,
                ServiceError::RegistryFull => StatusCode::SERVICE_UNAVAILABLE,
                ServiceError::IdCollision(_) | ServiceError::Credential(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `detail` field.
    fn detail(&self) -> String {
        match self {
            Self::Service(e) if e.is_client_error() => e.to_string(),
            Self::Service(ServiceError::RegistryFull) => ServiceError::RegistryFull.to_string(),
            Self::InvalidPayload(msg) => msg.clone(),
            Self::PayloadTooLarge => "Payload too large".to_string(),
            // Never expose credential or worker internals
            Self::Service(_) | Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        }

        let body = ErrorBody {
            detail: self.detail(),
        };
        (status, Json(body)).into_response()
    }
}
