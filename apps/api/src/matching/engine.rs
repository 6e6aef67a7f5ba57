//! Match Engine: multi-factor scoring of every catalog archetype against a student.
//!
//! composite = w.vector × vector_similarity + w.skill × skill_overlap + w.interest × interest_overlap
//!
//! Candidates are ranked by composite descending, ties broken by archetype id
//! ascending, so the order never depends on catalog iteration order.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{CareerArchetype, CareerCatalog};
use crate::errors::CoreError;
use crate::matching::similarity::{jaccard, normalize_terms, vector_similarity};
use crate::personality::PersonalityVector;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Factor weights. Must be non-negative and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub vector: f64,
    pub skill: f64,
    pub interest: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            vector: 0.6,
            skill: 0.25,
            interest: 0.15,
        }
    }
}

impl MatchWeights {
    pub fn new(vector: f64, skill: f64, interest: f64) -> Result<Self, CoreError> {
        let weights = Self {
            vector,
            skill,
            interest,
        };
        for (name, w) in [("vector", vector), ("skill", skill), ("interest", interest)] {
            if !w.is_finite() || w < 0.0 {
                return Err(CoreError::InvalidArgument(format!(
                    "{name} weight {w} must be a non-negative number"
                )));
            }
        }
        let sum = vector + skill + interest;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(CoreError::InvalidArgument(format!(
                "match weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(weights)
    }
}

/// Caps for the primary and alternative lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchLimits {
    pub top_k: usize,
    pub alt_k: usize,
}

impl MatchLimits {
    /// Validates caller-supplied caps; negative values are rejected.
    pub fn new(top_k: i64, alt_k: i64) -> Result<Self, CoreError> {
        let top_k = usize::try_from(top_k)
            .map_err(|_| CoreError::InvalidArgument(format!("top_k must be >= 0, got {top_k}")))?;
        let alt_k = usize::try_from(alt_k)
            .map_err(|_| CoreError::InvalidArgument(format!("alt_k must be >= 0, got {alt_k}")))?;
        Ok(Self { top_k, alt_k })
    }
}

/// Per-factor sub-scores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    pub vector_similarity: f64,
    pub skill_overlap: f64,
    pub interest_overlap: f64,
}

/// One ranked archetype. Built fresh for each matching request.
#[derive(Debug, Clone, Serialize)]
pub struct MatchCandidate {
    pub career: Arc<CareerArchetype>,
    pub score: f64,
    pub factors: FactorScores,
    /// 1-based position in the full ranking (alternatives continue after primary).
    pub rank: usize,
    /// Required skills the student already lists.
    pub matched_skills: Vec<String>,
    /// Required skills the student does not list.
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub primary: Vec<MatchCandidate>,
    pub alternatives: Vec<MatchCandidate>,
}

/// Stateless scorer; safe to share across any number of concurrent requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchEngine {
    weights: MatchWeights,
}

impl MatchEngine {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> MatchWeights {
        self.weights
    }

    /// Ranks the whole catalog and splits it into primary (≤ top_k) and
    /// alternatives (≤ alt_k, drawn from what follows primary).
    pub fn match_careers(
        &self,
        student: &PersonalityVector,
        skills: &[String],
        interests: &[String],
        catalog: &CareerCatalog,
        limits: MatchLimits,
    ) -> MatchResult {
        let skills = normalize_terms(skills.iter().map(String::as_str));
        let interests = normalize_terms(interests.iter().map(String::as_str));

        let mut ranked: Vec<MatchCandidate> = catalog
            .all()
            .iter()
            .map(|career| self.score_candidate(student, &skills, &interests, career))
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.career.id.cmp(&b.career.id))
        });

        let mut primary = Vec::with_capacity(limits.top_k.min(ranked.len()));
        let mut alternatives = Vec::with_capacity(limits.alt_k.min(ranked.len()));
        for (position, mut candidate) in ranked.into_iter().enumerate() {
            candidate.rank = position + 1;
            if primary.len() < limits.top_k {
                primary.push(candidate);
            } else if alternatives.len() < limits.alt_k {
                alternatives.push(candidate);
            } else {
                break;
            }
        }

        MatchResult {
            primary,
            alternatives,
        }
    }

    /// Scores one archetype against already-normalized skill and interest sets.
    pub fn score_candidate(
        &self,
        student: &PersonalityVector,
        skills: &BTreeSet<String>,
        interests: &BTreeSet<String>,
        career: &Arc<CareerArchetype>,
    ) -> MatchCandidate {
        let required = normalize_terms(career.required_skills.iter().map(String::as_str));
        let career_terms = normalize_terms(career.interest_terms());

        let factors = FactorScores {
            vector_similarity: vector_similarity(student, &career.personality),
            skill_overlap: jaccard(skills, &required),
            interest_overlap: jaccard(interests, &career_terms),
        };

        let score = self.weights.vector * factors.vector_similarity
            + self.weights.skill * factors.skill_overlap
            + self.weights.interest * factors.interest_overlap;

        let (matched_skills, missing_skills): (Vec<String>, Vec<String>) =
            required.into_iter().partition(|s| skills.contains(s));

        MatchCandidate {
            career: Arc::clone(career),
            score,
            factors,
            rank: 0,
            matched_skills,
            missing_skills,
        }
    }
}
