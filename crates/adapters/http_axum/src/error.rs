//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use gymdesk_domain::error::{GymError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

/// Maps [`GymError`] (and missing credentials) to an HTTP response with the
/// appropriate status code.
#[derive(Debug)]
pub enum ApiError {
    /// No usable `x-user-id` header, or it names no known user.
    Unauthenticated(&'static str),
    Domain(GymError),
}

impl ApiError {
    /// A path segment that should have been an identifier.
    pub(crate) fn invalid_id(raw: &str) -> Self {
        Self::Domain(ValidationError::InvalidId(raw.to_string()).into())
    }

    /// A body or query string that could not be decoded.
    pub(crate) fn malformed(reason: String) -> Self {
        Self::Domain(ValidationError::MalformedRequest(reason).into())
    }
}

impl From<GymError> for ApiError {
    fn from(err: GymError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            Self::Unauthenticated(reason) => {
                let body = ErrorBody {
                    error: reason.to_string(),
                    code: "unauthenticated",
                };
                return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
            }
            Self::Domain(err) => err,
        };

        let status = match &err {
            GymError::Validation(_) | GymError::Rule(_) => StatusCode::BAD_REQUEST,
            GymError::Permission(_) => StatusCode::FORBIDDEN,
            GymError::NotFound(_) => StatusCode::NOT_FOUND,
            GymError::Conflict(_) => StatusCode::CONFLICT,
            GymError::Storage(source) => {
                tracing::error!(error = %source, "storage error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = match &err {
            GymError::Storage(_) => "internal server error".to_string(),
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: message,
            code: err.code(),
        };
        (status, Json(body)).into_response()
    }
}
