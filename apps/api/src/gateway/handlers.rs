use std::time::Duration;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::gateway::{CachedGeneration, PromptRequest};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub prompt: PromptRequest,
    /// Per-attempt timeout; the configured default applies when absent.
    pub timeout_ms: Option<u64>,
}

/// POST /api/v1/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<CachedGeneration>, AppError> {
    let timeout = match req.timeout_ms {
        Some(0) => {
            return Err(AppError::Validation(
                "timeout_ms must be greater than zero".to_string(),
            ))
        }
        Some(ms) => Duration::from_millis(ms),
        None => state.gateway.config().default_timeout,
    };

    let generation = state.gateway.generate(&req.prompt, timeout).await?;
    Ok(Json(generation))
}
