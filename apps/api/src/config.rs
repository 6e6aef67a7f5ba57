use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Generation cache backing store; in-process when unset.
    pub redis_url: Option<String>,
    /// PostgreSQL catalog source.
    pub database_url: Option<String>,
    /// JSON catalog file. Wins over `database_url`.
    pub catalog_path: Option<String>,
    /// JSON question bank; the built-in RIASEC inventory when unset.
    pub question_bank_path: Option<String>,
    pub generation_cache_ttl_secs: u64,
    pub generation_max_attempts: u32,
    pub generation_timeout_secs: u64,
    pub generation_backoff_base_ms: u64,
    pub generation_backoff_max_ms: u64,
    pub discovery_top_k: i64,
    pub discovery_alt_k: i64,
    pub match_weight_vector: f64,
    pub match_weight_skill: f64,
    pub match_weight_interest: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            redis_url: optional_env("REDIS_URL"),
            database_url: optional_env("DATABASE_URL"),
            catalog_path: optional_env("CATALOG_PATH"),
            question_bank_path: optional_env("QUESTION_BANK_PATH"),
            generation_cache_ttl_secs: env_or("GENERATION_CACHE_TTL_SECS", 3600)?,
            generation_max_attempts: env_or("GENERATION_MAX_ATTEMPTS", 3)?,
            generation_timeout_secs: env_or("GENERATION_TIMEOUT_SECS", 30)?,
            generation_backoff_base_ms: env_or("GENERATION_BACKOFF_BASE_MS", 500)?,
            generation_backoff_max_ms: env_or("GENERATION_BACKOFF_MAX_MS", 8000)?,
            discovery_top_k: env_or("DISCOVERY_TOP_K", 2)?,
            discovery_alt_k: env_or("DISCOVERY_ALT_K", 5)?,
            match_weight_vector: env_or("MATCH_WEIGHT_VECTOR", 0.6)?,
            match_weight_skill: env_or("MATCH_WEIGHT_SKILL", 0.25)?,
            match_weight_interest: env_or("MATCH_WEIGHT_INTEREST", 0.15)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} has invalid value '{raw}'"))
}
