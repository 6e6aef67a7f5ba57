use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::gateway::templates::CAREER_RATIONALE;
use crate::gateway::{GenerationGateway, PromptRequest};
use crate::matching::MatchCandidate;
use crate::personality::PersonalityCode;

/// Generated explanation for one primary match.
#[derive(Debug, Clone, Serialize)]
pub struct CareerRationale {
    pub career_id: String,
    pub text: String,
    pub cached: bool,
    pub correlation_id: Uuid,
}

/// Outcome of the optional generation step. Never turns discovery into an error.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Enrichment {
    NotRequested,
    Enriched {
        rationales: Vec<CareerRationale>,
    },
    Failed {
        reason: String,
        correlation_id: Option<Uuid>,
    },
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

pub fn rationale_request(code: &PersonalityCode, candidate: &MatchCandidate) -> PromptRequest {
    let career = &candidate.career;
    PromptRequest::new(CAREER_RATIONALE)
        .with_param("personality_code", code.to_string())
        .with_param("career_title", career.title.as_str())
        .with_param("career_category", career.category.as_str())
        .with_param(
            "vector_similarity",
            format!("{:.2}", candidate.factors.vector_similarity),
        )
        .with_param("skill_overlap", format!("{:.2}", candidate.factors.skill_overlap))
        .with_param(
            "interest_overlap",
            format!("{:.2}", candidate.factors.interest_overlap),
        )
        .with_param("matched_skills", list_or_none(&candidate.matched_skills))
        .with_param("missing_skills", list_or_none(&candidate.missing_skills))
}

/// One rationale per primary match, requested concurrently. Any failure marks
/// the whole enrichment as failed; the first error in rank order is reported.
pub async fn enrich(
    gateway: &GenerationGateway,
    code: &PersonalityCode,
    primary: &[MatchCandidate],
    timeout: Duration,
) -> Enrichment {
    let requests: Vec<PromptRequest> = primary
        .iter()
        .map(|candidate| rationale_request(code, candidate))
        .collect();

    let outcomes = join_all(
        requests
            .iter()
            .map(|request| gateway.generate(request, timeout)),
    )
    .await;

    let mut rationales = Vec::with_capacity(outcomes.len());
    for (candidate, outcome) in primary.iter().zip(outcomes) {
        match outcome {
            Ok(generation) => rationales.push(CareerRationale {
                career_id: candidate.career.id.clone(),
                text: generation.text,
                cached: generation.cached,
                correlation_id: generation.correlation_id,
            }),
            Err(e) => {
                warn!(career = %candidate.career.id, "Enrichment failed, returning baseline result: {e}");
                return Enrichment::Failed {
                    reason: e.to_string(),
                    correlation_id: e.correlation_id(),
                };
            }
        }
    }

    Enrichment::Enriched { rationales }
}
