//! RIASEC personality model: categories, the six-score vector, and the derived code.
//!
//! Vectors are plain `Copy` values: once computed for an answer set nothing mutates them.

pub mod handlers;
pub mod questions;
pub mod scorer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub use questions::{Question, QuestionBank};
pub use scorer::{AnswerSheet, PersonalityScorer};

/// Upper bound of every category score.
pub const MAX_SCORE: f64 = 100.0;

/// The six RIASEC categories. Declaration order is the fixed tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Realistic,
    Investigative,
    Artistic,
    Social,
    Enterprising,
    Conventional,
}

impl Category {
    /// All categories in priority order.
    pub const ALL: [Category; 6] = [
        Category::Realistic,
        Category::Investigative,
        Category::Artistic,
        Category::Social,
        Category::Enterprising,
        Category::Conventional,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Realistic => "Realistic",
            Category::Investigative => "Investigative",
            Category::Artistic => "Artistic",
            Category::Social => "Social",
            Category::Enterprising => "Enterprising",
            Category::Conventional => "Conventional",
        }
    }

    pub fn letter(self) -> char {
        match self {
            Category::Realistic => 'R',
            Category::Investigative => 'I',
            Category::Artistic => 'A',
            Category::Social => 'S',
            Category::Enterprising => 'E',
            Category::Conventional => 'C',
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    /// Accepts the full label or the single RIASEC letter, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| {
                c.label().eq_ignore_ascii_case(needle)
                    || (needle.len() == 1 && needle.eq_ignore_ascii_case(&c.letter().to_string()))
            })
            .ok_or_else(|| CoreError::InvalidCategory(s.to_string()))
    }
}

/// Six category scores, each within [0, 100].
///
/// Fields are private: every vector comes from `from_scores`, the scorer, or
/// deserialization, and all three check the range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "VectorScores")]
pub struct PersonalityVector {
    realistic: f64,
    investigative: f64,
    artistic: f64,
    social: f64,
    enterprising: f64,
    conventional: f64,
}

/// Wire shape of a vector before range checking.
#[derive(Deserialize)]
struct VectorScores {
    realistic: f64,
    investigative: f64,
    artistic: f64,
    social: f64,
    enterprising: f64,
    conventional: f64,
}

impl TryFrom<VectorScores> for PersonalityVector {
    type Error = CoreError;

    fn try_from(raw: VectorScores) -> Result<Self, Self::Error> {
        PersonalityVector::from_scores([
            raw.realistic,
            raw.investigative,
            raw.artistic,
            raw.social,
            raw.enterprising,
            raw.conventional,
        ])
    }
}

impl PersonalityVector {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Builds a vector from scores in priority order, rejecting out-of-range values.
    pub fn from_scores(scores: [f64; 6]) -> Result<Self, CoreError> {
        let vector = Self {
            realistic: scores[0],
            investigative: scores[1],
            artistic: scores[2],
            social: scores[3],
            enterprising: scores[4],
            conventional: scores[5],
        };
        vector.validate()?;
        Ok(vector)
    }

    fn validate(&self) -> Result<(), CoreError> {
        for category in Category::ALL {
            let score = self.get(category);
            if !score.is_finite() || !(0.0..=MAX_SCORE).contains(&score) {
                return Err(CoreError::InvalidArgument(format!(
                    "{category} score {score} is outside [0, {MAX_SCORE}]"
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, category: Category) -> f64 {
        self.scores()[category.index()]
    }

    /// Scores in priority order.
    pub fn scores(&self) -> [f64; 6] {
        [
            self.realistic,
            self.investigative,
            self.artistic,
            self.social,
            self.enterprising,
            self.conventional,
        ]
    }

    pub fn is_zero(&self) -> bool {
        self.scores().iter().all(|s| *s == 0.0)
    }
}

/// Top three categories by score. Derived from a vector, never edited directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PersonalityCode([Category; 3]);

impl PersonalityCode {
    pub fn categories(&self) -> &[Category; 3] {
        &self.0
    }
}

impl fmt::Display for PersonalityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for category in self.0 {
            write!(f, "{}", category.letter())?;
        }
        Ok(())
    }
}

/// Sorts categories by score descending; ties keep priority order (stable sort).
pub fn derive_code(vector: &PersonalityVector) -> PersonalityCode {
    let mut ordered = Category::ALL;
    ordered.sort_by(|a, b| vector.get(*b).total_cmp(&vector.get(*a)));
    PersonalityCode([ordered[0], ordered[1], ordered[2]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parses_label_and_letter() {
        assert_eq!("investigative".parse::<Category>().unwrap(), Category::Investigative);
        assert_eq!(" Social ".parse::<Category>().unwrap(), Category::Social);
        assert_eq!("e".parse::<Category>().unwrap(), Category::Enterprising);
    }

    #[test]
    fn test_unknown_category_is_invalid_category() {
        let err = "Mystic".parse::<Category>().unwrap_err();
        assert_eq!(err, CoreError::InvalidCategory("Mystic".to_string()));
    }

    #[test]
    fn test_all_tie_yields_ria() {
        let vector = PersonalityVector::from_scores([50.0; 6]).unwrap();
        let code = derive_code(&vector);
        assert_eq!(
            code.categories(),
            &[Category::Realistic, Category::Investigative, Category::Artistic]
        );
        assert_eq!(code.to_string(), "RIA");
    }

    #[test]
    fn test_zero_vector_code_uses_priority_order() {
        assert_eq!(derive_code(&PersonalityVector::zero()).to_string(), "RIA");
    }

    #[test]
    fn test_partial_tie_breaks_by_priority() {
        // S and E tie at 90; S is earlier in priority order.
        let vector = PersonalityVector::from_scores([10.0, 20.0, 30.0, 90.0, 90.0, 80.0]).unwrap();
        assert_eq!(derive_code(&vector).to_string(), "SEC");
    }

    #[test]
    fn test_from_scores_rejects_out_of_range() {
        assert!(PersonalityVector::from_scores([101.0, 0.0, 0.0, 0.0, 0.0, 0.0]).is_err());
        assert!(PersonalityVector::from_scores([-1.0, 0.0, 0.0, 0.0, 0.0, 0.0]).is_err());
        assert!(PersonalityVector::from_scores([f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_deserialization_enforces_range() {
        let ok: PersonalityVector = serde_json::from_value(serde_json::json!({
            "realistic": 10, "investigative": 20, "artistic": 30,
            "social": 40, "enterprising": 50, "conventional": 60
        }))
        .unwrap();
        assert_eq!(ok.get(Category::Social), 40.0);

        let err = serde_json::from_value::<PersonalityVector>(serde_json::json!({
            "realistic": 10, "investigative": 20, "artistic": 30,
            "social": 140, "enterprising": 50, "conventional": 60
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Social score 140"));
    }

    #[test]
    fn test_vector_serializes_with_category_names() {
        let vector = PersonalityVector::from_scores([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let json = serde_json::to_value(vector).unwrap();
        assert_eq!(json["enterprising"], 5.0);
        let back: PersonalityVector = serde_json::from_value(json).unwrap();
        assert_eq!(back, vector);
    }

    #[test]
    fn test_code_serializes_as_labels() {
        let vector = PersonalityVector::from_scores([100.0, 80.0, 20.0, 40.0, 60.0, 20.0]).unwrap();
        let json = serde_json::to_value(derive_code(&vector)).unwrap();
        assert_eq!(json, serde_json::json!(["Realistic", "Investigative", "Enterprising"]));
    }
}
