use axum::{extract::State, Json};
use serde::Deserialize;

use crate::discovery::handlers::resolve_limits;
use crate::errors::AppError;
use crate::matching::MatchResult;
use crate::personality::PersonalityVector;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MatchRequest {
    pub personality: PersonalityVector,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub top_k: Option<i64>,
    pub alt_k: Option<i64>,
}

/// POST /api/v1/careers/match
/// For callers that already hold a vector and want ranking only.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let limits = resolve_limits(state.orchestrator.defaults(), req.top_k, req.alt_k)?;

    let result = state.orchestrator.engine().match_careers(
        &req.personality,
        &req.skills,
        &req.interests,
        &state.catalog,
        limits,
    );
    Ok(Json(result))
}
