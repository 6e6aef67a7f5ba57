mod catalog;
mod config;
mod db;
mod discovery;
mod errors;
mod gateway;
mod llm_client;
mod matching;
mod models;
mod personality;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::builtin::builtin_catalog;
use crate::catalog::loader::load_catalog_from_db;
use crate::catalog::CareerCatalog;
use crate::config::Config;
use crate::db::create_pool;
use crate::discovery::DiscoveryOrchestrator;
use crate::gateway::{
    GatewayConfig, GenerationGateway, GenerationStore, InMemoryGenerationStore,
    RedisGenerationStore, RetryPolicy,
};
use crate::llm_client::LlmClient;
use crate::matching::{MatchEngine, MatchLimits, MatchWeights};
use crate::personality::{PersonalityScorer, QuestionBank};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing or malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Compass API v{}", env!("CARGO_PKG_VERSION"));

    // Career catalog: file, then database, then the built-in set
    let catalog = Arc::new(load_catalog(&config).await?);
    if catalog.is_empty() {
        warn!("Career catalog is empty; every match will come back empty");
    } else {
        info!("Career catalog loaded ({} archetypes)", catalog.len());
    }

    let questions = Arc::new(load_question_bank(&config)?);
    info!("Question bank ready ({} statements)", questions.len());

    // Scoring pipeline
    let weights = MatchWeights::new(
        config.match_weight_vector,
        config.match_weight_skill,
        config.match_weight_interest,
    )
    .context("invalid MATCH_WEIGHT_* configuration")?;
    let limits = MatchLimits::new(config.discovery_top_k, config.discovery_alt_k)
        .context("invalid DISCOVERY_TOP_K / DISCOVERY_ALT_K")?;
    let orchestrator = DiscoveryOrchestrator::new(
        PersonalityScorer::new(questions),
        MatchEngine::new(weights),
        Arc::clone(&catalog),
        limits,
    );
    info!(
        "Match weights: vector={} skill={} interest={}, caps: top_k={} alt_k={}",
        weights.vector, weights.skill, weights.interest, limits.top_k, limits.alt_k
    );

    // Initialize LLM client and the gateway in front of it
    let llm = LlmClient::new(config.anthropic_api_key.clone())
        .context("failed to build the LLM HTTP client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let store = generation_store(&config).await;
    info!("Generation cache store: {}", store.name());

    let gateway = GenerationGateway::new(
        Arc::new(llm),
        store,
        GatewayConfig {
            cache_ttl: Duration::from_secs(config.generation_cache_ttl_secs),
            retry: RetryPolicy {
                max_attempts: config.generation_max_attempts.max(1),
                base_delay: Duration::from_millis(config.generation_backoff_base_ms),
                max_delay: Duration::from_millis(config.generation_backoff_max_ms),
            },
            default_timeout: Duration::from_secs(config.generation_timeout_secs),
        },
    );

    // Build app state
    let state = AppState {
        catalog,
        orchestrator: Arc::new(orchestrator),
        gateway,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn load_catalog(config: &Config) -> Result<CareerCatalog> {
    if let Some(path) = &config.catalog_path {
        info!("Loading career catalog from {path}");
        return CareerCatalog::from_json_file(Path::new(path));
    }
    if let Some(url) = &config.database_url {
        let pool = create_pool(url).await?;
        let catalog = load_catalog_from_db(&pool).await?;
        pool.close().await;
        return Ok(catalog);
    }
    info!("No CATALOG_PATH or DATABASE_URL set, using the built-in catalog");
    builtin_catalog().context("built-in catalog is invalid")
}

fn load_question_bank(config: &Config) -> Result<QuestionBank> {
    match &config.question_bank_path {
        Some(path) => QuestionBank::from_json_file(Path::new(path)),
        None => Ok(QuestionBank::riasec()),
    }
}

/// Redis when configured and reachable, otherwise the in-process store.
async fn generation_store(config: &Config) -> Arc<dyn GenerationStore> {
    let Some(url) = &config.redis_url else {
        return Arc::new(InMemoryGenerationStore::new());
    };

    let connected = match redis::Client::open(url.as_str()) {
        Ok(client) => RedisGenerationStore::connect(&client).await,
        Err(e) => {
            warn!("Invalid REDIS_URL ({e}), falling back to in-memory generation cache");
            return Arc::new(InMemoryGenerationStore::new());
        }
    };

    match connected {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("{e}; falling back to in-memory generation cache");
            Arc::new(InMemoryGenerationStore::new())
        }
    }
}
