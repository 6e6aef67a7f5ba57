//! Personality Scorer: turns per-question answers into a `PersonalityVector`.
//!
//! Algorithm:
//! 1. Numeric answer on question q: raw[q.category] += q.weight × answer,
//!    max[q.category] += q.weight × scale_max
//! 2. Weighted answer: raw[c] += min(w, scale_max) and max[c] += scale_max for
//!    every category c it names; the question's own category is ignored
//! 3. score[c] = raw[c] / max[c] × 100 (0 when nothing contributed to c)

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::personality::{Category, PersonalityCode, PersonalityVector, QuestionBank, MAX_SCORE};

/// Answer payload for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Likert value within the bank's scale.
    Numeric(f64),
    /// Explicit per-category weights, keyed by category label or letter.
    Weighted(BTreeMap<String, f64>),
}

/// Question id → answer. Ordered so accumulation order is fixed.
pub type AnswerSheet = BTreeMap<String, Answer>;

#[derive(Debug, Clone)]
pub struct PersonalityScorer {
    bank: Arc<QuestionBank>,
}

impl PersonalityScorer {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Scores an answer sheet. An empty sheet yields the zero vector.
    pub fn score(&self, answers: &AnswerSheet) -> Result<PersonalityVector, CoreError> {
        let scale_min = self.bank.scale_min();
        let scale_max = self.bank.scale_max();

        let mut raw = [0.0_f64; 6];
        let mut max = [0.0_f64; 6];

        for (question_id, answer) in answers {
            let question = self.bank.get(question_id).ok_or_else(|| {
                CoreError::InvalidArgument(format!("unknown question id '{question_id}'"))
            })?;

            match answer {
                Answer::Numeric(value) => {
                    if !value.is_finite() || *value < scale_min || *value > scale_max {
                        return Err(CoreError::InvalidArgument(format!(
                            "answer {value} to '{question_id}' is outside [{scale_min}, {scale_max}]"
                        )));
                    }
                    let slot = question.category as usize;
                    raw[slot] += question.weight * value;
                    max[slot] += question.weight * scale_max;
                }
                Answer::Weighted(weights) => {
                    for (name, weight) in weights {
                        let category: Category = name.parse()?;
                        if !weight.is_finite() || *weight < 0.0 {
                            return Err(CoreError::InvalidArgument(format!(
                                "weight {weight} for {category} in '{question_id}' must be non-negative"
                            )));
                        }
                        let slot = category as usize;
                        raw[slot] += weight.min(scale_max);
                        max[slot] += scale_max;
                    }
                }
            }
        }

        let mut scores = [0.0_f64; 6];
        for slot in 0..scores.len() {
            if max[slot] > 0.0 {
                scores[slot] = (raw[slot] * MAX_SCORE / max[slot]).clamp(0.0, MAX_SCORE);
            }
        }

        PersonalityVector::from_scores(scores)
    }

    pub fn derive_code(&self, vector: &PersonalityVector) -> PersonalityCode {
        crate::personality::derive_code(vector)
    }
}
