use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Error taxonomy shared by the scoring pipeline and the generation gateway.
///
/// Validation-class variants are returned synchronously and never retried.
/// `Clone` is required so one coalesced generation outcome can be handed to
/// every waiter on the same cache key.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoreError {
    #[error("Unknown personality category: {0}")]
    InvalidCategory(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transient backend failure (correlation {correlation_id}): {message}")]
    TransientBackendFailure {
        message: String,
        correlation_id: Uuid,
    },

    #[error("Backend failure (correlation {correlation_id}): {message}")]
    TerminalBackendFailure {
        message: String,
        correlation_id: Uuid,
    },

    #[error("Generation cache unavailable: {0}")]
    CacheUnavailable(String),
}

impl CoreError {
    /// Correlation id of the backend attempt that produced this error, if any.
    pub fn correlation_id(&self) -> Option<Uuid> {
        match self {
            CoreError::TransientBackendFailure { correlation_id, .. }
            | CoreError::TerminalBackendFailure { correlation_id, .. } => Some(*correlation_id),
            _ => None,
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidCategory(_) | CoreError::InvalidArgument(_) => {
                AppError::Validation(err.to_string())
            }
            CoreError::NotFound(what) => AppError::NotFound(what),
            CoreError::TransientBackendFailure { .. } | CoreError::TerminalBackendFailure { .. } => {
                AppError::Llm(err.to_string())
            }
            CoreError::CacheUnavailable(_) => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        let response = AppError::from(CoreError::InvalidCategory("Mystic".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response =
            AppError::from(CoreError::InvalidArgument("top_k".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::from(CoreError::NotFound("career x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_backend_failure_message_carries_correlation_id() {
        let id = Uuid::new_v4();
        let err = AppError::from(CoreError::TerminalBackendFailure {
            message: "unauthorized".to_string(),
            correlation_id: id,
        });
        assert!(err.to_string().contains(&id.to_string()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_correlation_id_only_on_backend_variants() {
        let id = Uuid::new_v4();
        let transient = CoreError::TransientBackendFailure {
            message: "503".to_string(),
            correlation_id: id,
        };
        assert_eq!(transient.correlation_id(), Some(id));
        assert_eq!(CoreError::CacheUnavailable("down".into()).correlation_id(), None);
    }
}
