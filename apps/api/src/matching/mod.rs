// Career matching: vector/skill/interest similarity and top-K selection.
// Pure computation over immutable inputs; no shared mutable state.

pub mod engine;
pub mod handlers;
pub mod similarity;

pub use engine::{MatchCandidate, MatchEngine, MatchLimits, MatchResult, MatchWeights};
