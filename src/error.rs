use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("limiter capacity must be at least 1")]
    ZeroCapacity,

    #[error("limiter window must be longer than zero")]
    ZeroWindow,

    #[error("invalid identity header name: {0}")]
    InvalidHeader(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("registrations are closed")]
    RegistrationsClosed,

    #[error("suspicious user agent")]
    SuspiciousAgent,

    #[error("too many requests")]
    TooManyRequests,

    #[error("invalid form data")]
    InvalidForm(FieldErrors),

    #[error("bot verification failed")]
    VerificationFailed,

    #[error("application already submitted")]
    AlreadySubmitted,

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Not authenticated"),
            ApiError::RegistrationsClosed => (StatusCode::FORBIDDEN, "Registrations closed"),
            // plain text, the way proxies usually answer this
            ApiError::SuspiciousAgent => {
                return (StatusCode::FORBIDDEN, "Blocked: Suspicious User-Agent").into_response();
            }
            ApiError::TooManyRequests => (StatusCode::TOO_MANY_REQUESTS, "Too many requests"),
            ApiError::InvalidForm(details) => {
                let body = Json(json!({
                    "error": "Invalid form data",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            ApiError::VerificationFailed => {
                (StatusCode::BAD_REQUEST, "reCAPTCHA verification failed")
            }
            ApiError::AlreadySubmitted => (StatusCode::BAD_REQUEST, "Already submitted"),
            ApiError::Internal(detail) => {
                error!(%detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to submit application")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let cases = [
            (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ApiError::RegistrationsClosed, StatusCode::FORBIDDEN),
            (ApiError::SuspiciousAgent, StatusCode::FORBIDDEN),
            (ApiError::TooManyRequests, StatusCode::TOO_MANY_REQUESTS),
            (ApiError::InvalidForm(FieldErrors::default()), StatusCode::BAD_REQUEST),
            (ApiError::VerificationFailed, StatusCode::BAD_REQUEST),
            (ApiError::AlreadySubmitted, StatusCode::BAD_REQUEST),
            (ApiError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
