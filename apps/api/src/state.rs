use std::sync::Arc;

use crate::catalog::CareerCatalog;
use crate::discovery::DiscoveryOrchestrator;
use crate::gateway::GenerationGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup; read-only afterwards.
    pub catalog: Arc<CareerCatalog>,
    /// Owns the scorer, match engine and the default caps.
    pub orchestrator: Arc<DiscoveryOrchestrator>,
    pub gateway: GenerationGateway,
}
