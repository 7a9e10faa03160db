use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use taskd_core::Violation;
use taskd_store::StoreError;

/// Centralized error responder. Every handler failure flows through here;
/// validation and not-found are expected outcomes, anything else is a fault.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with every violated rule enumerated.
    Validation(Vec<Violation>),
    /// 404 with the task-specific message.
    NotFound,
    /// 500; fault detail is included only in development mode.
    Internal { detail: Option<String> },
}

impl ApiError {
    /// Map a store failure to a response, exposing the underlying fault only
    /// when the service is configured to do so.
    pub fn from_store(err: StoreError, expose_detail: bool) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound,
            other => {
                tracing::error!(error = %other, "store operation failed");
                Self::Internal {
                    detail: expose_detail.then(|| other.to_string()),
                }
            }
        }
    }
}

impl From<Violation> for ApiError {
    fn from(violation: Violation) -> Self {
        Self::Validation(vec![violation])
    }
}

impl From<Vec<Violation>> for ApiError {
    fn from(violations: Vec<Violation>) -> Self {
        Self::Validation(violations)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": violations })),
            )
                .into_response(),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Task not found" })),
            )
                .into_response(),
            Self::Internal { detail } => {
                let mut body = json!({ "error": "Something went wrong!" });
                if let Some(detail) = detail {
                    body["detail"] = json!(detail);
                }
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_store_variant() {
        let err = ApiError::from_store(StoreError::NotFound("task 9".into()), false);
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn database_fault_hides_detail_by_default() {
        let err = ApiError::from_store(StoreError::Database("disk I/O error".into()), false);
        match err {
            ApiError::Internal { detail } => assert!(detail.is_none()),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn database_fault_exposes_detail_in_development() {
        let err = ApiError::from_store(StoreError::Database("disk I/O error".into()), true);
        match err {
            ApiError::Internal { detail } => {
                assert!(detail.unwrap().contains("disk I/O error"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
