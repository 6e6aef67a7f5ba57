use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::CoreError;
use crate::personality::Category;

/// Default Likert scale bounds.
pub const SCALE_MIN: f64 = 1.0;
pub const SCALE_MAX: f64 = 5.0;

/// One assessment statement, statically tied to a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub category: Category,
    pub text: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

fn default_scale_min() -> f64 {
    SCALE_MIN
}

fn default_scale_max() -> f64 {
    SCALE_MAX
}

/// On-disk shape of a custom question bank.
#[derive(Deserialize)]
struct QuestionBankFile {
    #[serde(default = "default_scale_min")]
    scale_min: f64,
    #[serde(default = "default_scale_max")]
    scale_max: f64,
    questions: Vec<Question>,
}

/// The fixed question → (category, weight) association plus the scale bounds.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: HashMap<String, Question>,
    scale_min: f64,
    scale_max: f64,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>, scale_min: f64, scale_max: f64) -> Result<Self, CoreError> {
        if !(scale_min.is_finite() && scale_max.is_finite() && scale_max > scale_min && scale_min >= 0.0)
        {
            return Err(CoreError::InvalidArgument(format!(
                "invalid Likert scale [{scale_min}, {scale_max}]"
            )));
        }
        if questions.is_empty() {
            return Err(CoreError::InvalidArgument(
                "question bank has no questions".to_string(),
            ));
        }

        let mut by_id = HashMap::with_capacity(questions.len());
        for question in questions {
            if !question.weight.is_finite() || question.weight <= 0.0 {
                return Err(CoreError::InvalidArgument(format!(
                    "question '{}' has non-positive weight {}",
                    question.id, question.weight
                )));
            }
            if by_id.contains_key(&question.id) {
                return Err(CoreError::InvalidArgument(format!(
                    "duplicate question id '{}'",
                    question.id
                )));
            }
            by_id.insert(question.id.clone(), question);
        }

        Ok(Self {
            questions: by_id,
            scale_min,
            scale_max,
        })
    }

    /// Loads a bank from `{"scale_min", "scale_max", "questions": [...]}`.
    /// Scale bounds default to the 1–5 Likert scale.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read question bank {}", path.display()))?;
        let file: QuestionBankFile = serde_json::from_str(&raw)
            .with_context(|| format!("Question bank {} is not valid JSON", path.display()))?;
        let bank = QuestionBank::new(file.questions, file.scale_min, file.scale_max)
            .with_context(|| format!("Question bank {} failed validation", path.display()))?;

        info!("Loaded {} questions from {}", bank.len(), path.display());
        Ok(bank)
    }

    /// The built-in RIASEC inventory: three statements per category on a 1–5 scale.
    pub fn riasec() -> Self {
        let questions = RIASEC_STATEMENTS
            .iter()
            .map(|(id, category, text)| {
                let question = Question {
                    id: id.to_string(),
                    category: *category,
                    text: text.to_string(),
                    weight: 1.0,
                };
                (question.id.clone(), question)
            })
            .collect();

        Self {
            questions,
            scale_min: SCALE_MIN,
            scale_max: SCALE_MAX,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.get(id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn scale_min(&self) -> f64 {
        self.scale_min
    }

    pub fn scale_max(&self) -> f64 {
        self.scale_max
    }

    /// Questions sorted by id, for presenting the assessment.
    pub fn questions(&self) -> Vec<&Question> {
        let mut all: Vec<&Question> = self.questions.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}

const RIASEC_STATEMENTS: &[(&str, Category, &str)] = &[
    ("r1", Category::Realistic, "I like to build or repair things with my hands"),
    ("r2", Category::Realistic, "I enjoy working outdoors or with machines and tools"),
    ("r3", Category::Realistic, "I prefer practical tasks with visible results"),
    ("i1", Category::Investigative, "I like to figure out how things work"),
    ("i2", Category::Investigative, "I enjoy solving math or science problems"),
    ("i3", Category::Investigative, "I like to research a topic in depth"),
    ("a1", Category::Artistic, "I enjoy drawing, writing, or making music"),
    ("a2", Category::Artistic, "I like to express myself in original ways"),
    ("a3", Category::Artistic, "I prefer unstructured work where I can be creative"),
    ("s1", Category::Social, "I like helping people with their problems"),
    ("s2", Category::Social, "I enjoy teaching or explaining things to others"),
    ("s3", Category::Social, "I like working in teams and caring for others"),
    ("e1", Category::Enterprising, "I like to lead and persuade people"),
    ("e2", Category::Enterprising, "I enjoy starting projects or selling ideas"),
    ("e3", Category::Enterprising, "I am comfortable taking risks to reach a goal"),
    ("c1", Category::Conventional, "I like working with numbers and records"),
    ("c2", Category::Conventional, "I enjoy following clear procedures"),
    ("c3", Category::Conventional, "I like keeping things organized and accurate"),
];
