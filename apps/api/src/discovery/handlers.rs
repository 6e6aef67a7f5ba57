use axum::{extract::State, Json};
use serde::Deserialize;

use crate::discovery::{DiscoveryResult, StudentProfile};
use crate::errors::AppError;
use crate::matching::MatchLimits;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DiscoveryRequest {
    #[serde(flatten)]
    pub profile: StudentProfile,
    /// Ask the generation backend for per-career rationale.
    #[serde(default)]
    pub enrich: bool,
    pub top_k: Option<i64>,
    pub alt_k: Option<i64>,
}

/// POST /api/v1/discovery
pub async fn handle_discovery(
    State(state): State<AppState>,
    Json(req): Json<DiscoveryRequest>,
) -> Result<Json<DiscoveryResult>, AppError> {
    let orchestrator = &state.orchestrator;
    let custom_caps = req.top_k.is_some() || req.alt_k.is_some();
    let limits = resolve_limits(orchestrator.defaults(), req.top_k, req.alt_k)?;

    let result = if req.enrich {
        let timeout = state.gateway.config().default_timeout;
        orchestrator
            .discover_enriched(&req.profile, limits, &state.gateway, timeout)
            .await?
    } else if custom_caps {
        orchestrator.discover_with_limits(&req.profile, limits)?
    } else {
        orchestrator.discover(&req.profile)?
    };

    Ok(Json(result))
}

/// Caller-supplied caps, falling back to the configured ones field by field.
pub(crate) fn resolve_limits(
    defaults: MatchLimits,
    top_k: Option<i64>,
    alt_k: Option<i64>,
) -> Result<MatchLimits, AppError> {
    if top_k.is_none() && alt_k.is_none() {
        return Ok(defaults);
    }
    let limits = MatchLimits::new(
        top_k.unwrap_or(defaults.top_k as i64),
        alt_k.unwrap_or(defaults.alt_k as i64),
    )?;
    Ok(limits)
}
