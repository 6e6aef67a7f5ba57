/// Discovery Orchestrator: composes PersonalityScorer, MatchEngine and the
/// catalog into one `DiscoveryResult`.
///
/// Pure apart from the optional enrichment step: nothing is written anywhere,
/// persistence is the caller's business.
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::CareerCatalog;
use crate::discovery::enrichment::{enrich, Enrichment};
use crate::discovery::recommendations::build_recommendations;
use crate::errors::CoreError;
use crate::gateway::GenerationGateway;
use crate::matching::{MatchCandidate, MatchEngine, MatchLimits};
use crate::personality::{AnswerSheet, PersonalityCode, PersonalityScorer, PersonalityVector};

/// What the caller knows about the student. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Raw assessment answers. Take precedence over `personality` when non-empty.
    #[serde(default)]
    pub answers: AnswerSheet,
    /// Precomputed vector for students assessed elsewhere. Range-checked on deserialization.
    #[serde(default)]
    pub personality: Option<PersonalityVector>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    /// Free text; catalog vocabulary found in it joins the interests.
    #[serde(default)]
    pub about: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryResult {
    pub personality: PersonalityVector,
    pub personality_code: PersonalityCode,
    pub primary_matches: Vec<MatchCandidate>,
    pub alternative_matches: Vec<MatchCandidate>,
    pub recommendations: Vec<String>,
    pub discovered_at: DateTime<Utc>,
    pub enrichment: Enrichment,
}

#[derive(Debug, Clone)]
pub struct DiscoveryOrchestrator {
    scorer: PersonalityScorer,
    engine: MatchEngine,
    catalog: Arc<CareerCatalog>,
    defaults: MatchLimits,
    vocabulary: BTreeSet<String>,
}

impl DiscoveryOrchestrator {
    pub fn new(
        scorer: PersonalityScorer,
        engine: MatchEngine,
        catalog: Arc<CareerCatalog>,
        defaults: MatchLimits,
    ) -> Self {
        let vocabulary = catalog.vocabulary();
        Self {
            scorer,
            engine,
            catalog,
            defaults,
            vocabulary,
        }
    }

    pub fn scorer(&self) -> &PersonalityScorer {
        &self.scorer
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn defaults(&self) -> MatchLimits {
        self.defaults
    }

    /// Discovery with the configured primary/alternative caps.
    pub fn discover(&self, profile: &StudentProfile) -> Result<DiscoveryResult, CoreError> {
        self.discover_with_limits(profile, self.defaults)
    }

    /// Discovery with caller-supplied caps.
    pub fn discover_with_limits(
        &self,
        profile: &StudentProfile,
        limits: MatchLimits,
    ) -> Result<DiscoveryResult, CoreError> {
        let personality = self.resolve_vector(profile)?;
        let personality_code = self.scorer.derive_code(&personality);
        let interests = self.merged_interests(profile);

        let matched = self.engine.match_careers(
            &personality,
            &profile.skills,
            &interests,
            &self.catalog,
            limits,
        );

        let recommendations =
            build_recommendations(&personality_code, &matched.primary, &self.engine.weights());

        info!(
            code = %personality_code,
            primary = matched.primary.len(),
            alternatives = matched.alternatives.len(),
            "Discovery complete"
        );

        Ok(DiscoveryResult {
            personality,
            personality_code,
            primary_matches: matched.primary,
            alternative_matches: matched.alternatives,
            recommendations,
            discovered_at: Utc::now(),
            enrichment: Enrichment::NotRequested,
        })
    }

    /// Discovery plus one generated rationale per primary match. Generation
    /// failures are reported in `enrichment`; the baseline result is always returned.
    pub async fn discover_enriched(
        &self,
        profile: &StudentProfile,
        limits: MatchLimits,
        gateway: &GenerationGateway,
        timeout: Duration,
    ) -> Result<DiscoveryResult, CoreError> {
        let mut result = self.discover_with_limits(profile, limits)?;
        result.enrichment = enrich(
            gateway,
            &result.personality_code,
            &result.primary_matches,
            timeout,
        )
        .await;
        Ok(result)
    }

    fn resolve_vector(&self, profile: &StudentProfile) -> Result<PersonalityVector, CoreError> {
        if !profile.answers.is_empty() {
            return self.scorer.score(&profile.answers);
        }
        Ok(profile.personality.unwrap_or_else(PersonalityVector::zero))
    }

    fn merged_interests(&self, profile: &StudentProfile) -> Vec<String> {
        let mut interests = profile.interests.clone();
        if let Some(about) = profile.about.as_deref() {
            let found = terms_in_text(about, &self.vocabulary);
            if !found.is_empty() {
                debug!(terms = ?found, "interests picked up from profile text");
            }
            interests.extend(found);
        }
        interests
    }
}

/// Vocabulary terms that occur in `text` as whole words, case-insensitively.
/// Multi-word terms must appear as a contiguous run of words.
pub fn terms_in_text(text: &str, vocabulary: &BTreeSet<String>) -> Vec<String> {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    vocabulary
        .iter()
        .filter(|term| {
            let needle: Vec<&str> = term.split_whitespace().collect();
            !needle.is_empty()
                && words
                    .windows(needle.len())
                    .any(|window| window.iter().zip(&needle).all(|(w, n)| w == n))
        })
        .cloned()
        .collect()
}
