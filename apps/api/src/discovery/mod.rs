//! Discovery: scores a student, matches them against the catalog and packages
//! the result with baseline recommendations and optional generated rationale.

pub mod enrichment;
pub mod handlers;
pub mod orchestrator;
pub mod recommendations;

pub use orchestrator::{DiscoveryOrchestrator, DiscoveryResult, StudentProfile};
