/// Baseline recommendation text, built from each primary match's factor breakdown.
/// Deterministic and offline: discovery is complete without a generation backend.
use crate::matching::{MatchCandidate, MatchWeights};
use crate::personality::PersonalityCode;

/// How many missing skills the "develop" line names.
const SKILLS_TO_DEVELOP: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Factor {
    Personality,
    Skills,
    Interests,
}

/// The factor with the largest weighted contribution. Ties go to the earlier factor.
fn dominant_factor(candidate: &MatchCandidate, weights: &MatchWeights) -> Factor {
    let contributions = [
        (Factor::Personality, weights.vector * candidate.factors.vector_similarity),
        (Factor::Skills, weights.skill * candidate.factors.skill_overlap),
        (Factor::Interests, weights.interest * candidate.factors.interest_overlap),
    ];

    let mut best = contributions[0];
    for contribution in &contributions[1..] {
        if contribution.1 > best.1 {
            best = *contribution;
        }
    }
    best.0
}

fn percent(value: f64) -> u32 {
    (value * 100.0).round() as u32
}

fn reason_line(candidate: &MatchCandidate, code: &PersonalityCode, weights: &MatchWeights) -> String {
    let career = &candidate.career;
    match dominant_factor(candidate, weights) {
        Factor::Skills if !candidate.matched_skills.is_empty() => format!(
            "{} builds on skills you already have: {}.",
            career.title,
            candidate.matched_skills.join(", ")
        ),
        Factor::Interests => format!(
            "{} fits your interest in {}.",
            career.title,
            career.category.to_lowercase()
        ),
        _ => format!(
            "{} lines up with your {} personality profile ({}% alignment).",
            career.title,
            code,
            percent(candidate.factors.vector_similarity)
        ),
    }
}

pub fn build_recommendations(
    code: &PersonalityCode,
    primary: &[MatchCandidate],
    weights: &MatchWeights,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(primary.len() * 2 + 1);

    if primary.is_empty() {
        lines.push(
            "No careers are available to match yet. Answer more questions or add skills and interests to get suggestions."
                .to_string(),
        );
    }

    for candidate in primary {
        lines.push(reason_line(candidate, code, weights));

        if !candidate.missing_skills.is_empty() {
            let develop: Vec<&str> = candidate
                .missing_skills
                .iter()
                .take(SKILLS_TO_DEVELOP)
                .map(String::as_str)
                .collect();
            lines.push(format!(
                "To move toward {}, start developing: {}.",
                candidate.career.title,
                develop.join(", ")
            ));
        }
    }

    let labels: Vec<&str> = code.categories().iter().map(|c| c.label()).collect();
    lines.push(format!(
        "Your personality code is {} ({}).",
        code,
        labels.join(", ")
    ));

    lines
}
