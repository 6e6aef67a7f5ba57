// Prompt templates known to the generation gateway.
// Placeholders are `{name}`; every declared parameter must be supplied, no others.

use crate::llm_client::prompts::{COUNSELOR_SYSTEM, GROUNDING_INSTRUCTION};

#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub id: &'static str,
    pub system: &'static str,
    pub body: &'static str,
    pub params: &'static [&'static str],
}

pub const CAREER_RATIONALE: &str = "career_rationale";
pub const CAREER_QUESTION: &str = "career_question";

/// Explains why one matched career suits the student.
const CAREER_RATIONALE_BODY: &str = r#"{grounding_instruction}

STUDENT PERSONALITY CODE: {personality_code}

MATCHED CAREER: {career_title} ({career_category})
Personality alignment: {vector_similarity}
Skill overlap: {skill_overlap}
Interest overlap: {interest_overlap}
Skills the student already has: {matched_skills}
Skills still to develop: {missing_skills}

In 3 to 4 sentences, explain why this career fits the student and name one
concrete next step they could take this year."#;

/// Answers a student's free-form question about a specific career.
const CAREER_QUESTION_BODY: &str = r#"{grounding_instruction}

STUDENT PERSONALITY CODE: {personality_code}
CAREER: {career_title}

STUDENT QUESTION:
{question}

Answer in at most 5 sentences."#;

const TEMPLATES: &[PromptTemplate] = &[
    PromptTemplate {
        id: CAREER_RATIONALE,
        system: COUNSELOR_SYSTEM,
        body: CAREER_RATIONALE_BODY,
        params: &[
            "personality_code",
            "career_title",
            "career_category",
            "vector_similarity",
            "skill_overlap",
            "interest_overlap",
            "matched_skills",
            "missing_skills",
        ],
    },
    PromptTemplate {
        id: CAREER_QUESTION,
        system: COUNSELOR_SYSTEM,
        body: CAREER_QUESTION_BODY,
        params: &["personality_code", "career_title", "question"],
    },
];

pub fn find_template(id: &str) -> Option<&'static PromptTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Fills the template in one pass over the body, so text inside a
/// substituted value is never read as a placeholder. Callers have already
/// checked the parameter set.
pub(crate) fn fill(template: &PromptTemplate, params: &[(String, String)]) -> String {
    let mut rendered = String::with_capacity(template.body.len());
    let mut rest = template.body;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            rest = &rest[open..];
            break;
        };

        let name = &after[..close];
        let value = if name == "grounding_instruction" {
            Some(GROUNDING_INSTRUCTION)
        } else {
            params
                .iter()
                .find(|(param, _)| param == name)
                .map(|(_, value)| value.as_str())
        };
        match value {
            Some(value) => rendered.push_str(value),
            None => rendered.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }

    rendered.push_str(rest);
    rendered
}
