use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::personality::{AnswerSheet, PersonalityCode, PersonalityVector, Question};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub answers: AnswerSheet,
}

#[derive(Serialize)]
pub struct ScoreResponse {
    pub personality: PersonalityVector,
    pub personality_code: PersonalityCode,
    /// The code as letters, e.g. "RIE".
    pub code: String,
}

#[derive(Serialize)]
pub struct QuestionsResponse {
    pub scale_min: f64,
    pub scale_max: f64,
    pub questions: Vec<Question>,
}

/// GET /api/v1/assessment/questions
pub async fn handle_questions(State(state): State<AppState>) -> Json<QuestionsResponse> {
    let bank = state.orchestrator.scorer().bank();
    Json(QuestionsResponse {
        scale_min: bank.scale_min(),
        scale_max: bank.scale_max(),
        questions: bank.questions().into_iter().cloned().collect(),
    })
}

/// POST /api/v1/assessment/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let scorer = state.orchestrator.scorer();
    let personality = scorer.score(&req.answers)?;
    let personality_code = scorer.derive_code(&personality);

    Ok(Json(ScoreResponse {
        personality,
        code: personality_code.to_string(),
        personality_code,
    }))
}
