//! Application error type shared by every handler.
//!
//! Each variant maps onto one HTTP status and a short machine-readable kind:
//!
//! | Variant              | Status | Kind                    |
//! |----------------------|--------|-------------------------|
//! | `NotFound`           | 404    | `not_found`             |
//! | `Validation`         | 400    | `validation_failed`     |
//! | `Conflict`           | 409    | `conflict`              |
//! | `InvalidCredentials` | 401    | `invalid_credentials`   |
//! | `Store`              | 500    | `store_io_failure`      |
//! | `ServiceUnavailable` | 503    | `service_unavailable`   |
//! | `Upstream`           | 502    | `upstream_error`        |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::database::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error("Change was not saved: {0}")]
    Store(StoreError),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    Upstream(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    msg: String,
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_io_failure"),
            AppError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable")
            }
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => {
                AppError::NotFound(format!("No record '{}' in {}", id, collection))
            }
            other => AppError::Store(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();

        match &self {
            AppError::Store(err) => log::error!("store write failed: {}", err),
            AppError::ServiceUnavailable(msg) | AppError::Upstream(msg) => {
                log::warn!("collaborator failure: {}", msg)
            }
            _ => {}
        }

        let body = ErrorBody {
            error: kind,
            msg: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_becomes_404() {
        let err: AppError = StoreError::NotFound {
            collection: "products",
            id: "p-1".to_string(),
        }
        .into();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.status_and_kind().0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn io_failure_is_reported_as_not_persisted() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: AppError = StoreError::Io(io).into();

        assert_eq!(err.status_and_kind(), (StatusCode::INTERNAL_SERVER_ERROR, "store_io_failure"));
        assert!(err.to_string().starts_with("Change was not saved"));
    }

    #[test]
    fn unavailable_collaborator_has_distinct_status() {
        let err = AppError::ServiceUnavailable("AI Service Unavailable".into());
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
