use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::catalog::CareerArchetype;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    /// Whitespace- or comma-separated keywords.
    pub q: String,
}

/// GET /api/v1/careers
pub async fn handle_list_careers(State(state): State<AppState>) -> Json<Vec<Arc<CareerArchetype>>> {
    Json(state.catalog.all().to_vec())
}

/// GET /api/v1/careers/search?q=
pub async fn handle_search_careers(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Arc<CareerArchetype>>>, AppError> {
    let keywords: Vec<&str> = params
        .q
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        return Err(AppError::Validation(
            "search needs at least one keyword".to_string(),
        ));
    }
    Ok(Json(state.catalog.search(&keywords)))
}

/// GET /api/v1/careers/:id
pub async fn handle_get_career(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Arc<CareerArchetype>>, AppError> {
    Ok(Json(state.catalog.find(&id)?))
}
