use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `careers` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
    pub required_skills: Vec<String>,
    pub realistic: f64,
    pub investigative: f64,
    pub artistic: f64,
    pub social: f64,
    pub enterprising: f64,
    pub conventional: f64,
    pub growth_trend: String,
    pub salary_min_usd: i32,
    pub salary_max_usd: i32,
}
