//! Career Catalog: the immutable set of career archetypes consulted by matching.
//!
//! Loaded once at startup (built-in data, a JSON file, or PostgreSQL) and shared
//! as `Arc<CareerCatalog>`. Nothing mutates it afterwards, so reads need no locking.

pub mod builtin;
pub mod handlers;
pub mod loader;

use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::personality::PersonalityVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthTrend {
    Declining,
    Stable,
    Growing,
    HighGrowth,
}

impl FromStr for GrowthTrend {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "declining" => Ok(GrowthTrend::Declining),
            "stable" => Ok(GrowthTrend::Stable),
            "growing" => Ok(GrowthTrend::Growing),
            "high_growth" => Ok(GrowthTrend::HighGrowth),
            other => Err(CoreError::InvalidArgument(format!(
                "unknown growth trend '{other}'"
            ))),
        }
    }
}

/// Annual salary range in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBand {
    pub min_usd: u32,
    pub max_usd: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerArchetype {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub required_skills: Vec<String>,
    pub personality: PersonalityVector,
    pub growth_trend: GrowthTrend,
    pub salary_band: SalaryBand,
}

impl CareerArchetype {
    /// The archetype's category plus its tags, which is what interests are compared against.
    pub fn interest_terms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.category.as_str()).chain(self.tags.iter().map(String::as_str))
    }
}

/// Which field a search keyword hit. Declaration order is relevance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SearchHit {
    Title,
    Skill,
    Category,
}

#[derive(Debug, Clone, Default)]
pub struct CareerCatalog {
    careers: Vec<Arc<CareerArchetype>>,
    by_id: HashMap<String, usize>,
}

impl CareerCatalog {
    /// Builds a catalog, rejecting empty or duplicate ids and inverted salary bands.
    pub fn new(careers: Vec<CareerArchetype>) -> Result<Self, CoreError> {
        let mut by_id = HashMap::with_capacity(careers.len());
        let mut stored = Vec::with_capacity(careers.len());

        for (position, career) in careers.into_iter().enumerate() {
            if career.id.trim().is_empty() {
                return Err(CoreError::InvalidArgument(format!(
                    "career at position {position} has an empty id"
                )));
            }
            if career.salary_band.min_usd > career.salary_band.max_usd {
                return Err(CoreError::InvalidArgument(format!(
                    "career '{}' has an inverted salary band",
                    career.id
                )));
            }
            if by_id.insert(career.id.clone(), position).is_some() {
                return Err(CoreError::InvalidArgument(format!(
                    "duplicate career id '{}'",
                    career.id
                )));
            }
            stored.push(Arc::new(career));
        }

        Ok(Self {
            careers: stored,
            by_id,
        })
    }

    pub fn all(&self) -> &[Arc<CareerArchetype>] {
        &self.careers
    }

    pub fn len(&self) -> usize {
        self.careers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.careers.is_empty()
    }

    pub fn find(&self, id: &str) -> Result<Arc<CareerArchetype>, CoreError> {
        self.by_id
            .get(id)
            .map(|&i| Arc::clone(&self.careers[i]))
            .ok_or_else(|| CoreError::NotFound(format!("Career '{id}' not found")))
    }

    /// Case-insensitive substring search over title, required skills, and category/tags.
    ///
    /// Results are grouped title hits, then skill hits, then category hits; each
    /// archetype lands in the group of its best hit and groups keep catalog order.
    pub fn search<S: AsRef<str>>(&self, keywords: &[S]) -> Vec<Arc<CareerArchetype>> {
        let needles: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        if needles.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<(SearchHit, usize)> = self
            .careers
            .iter()
            .enumerate()
            .filter_map(|(position, career)| {
                best_hit(career, &needles).map(|hit| (hit, position))
            })
            .collect();

        hits.sort();
        hits.into_iter()
            .map(|(_, position)| Arc::clone(&self.careers[position]))
            .collect()
    }

    /// Lowercased category and tag terms across the catalog.
    pub fn vocabulary(&self) -> BTreeSet<String> {
        self.careers
            .iter()
            .flat_map(|c| c.interest_terms().map(|t| t.trim().to_lowercase()))
            .filter(|t| !t.is_empty())
            .collect()
    }
}

fn best_hit(career: &CareerArchetype, needles: &[String]) -> Option<SearchHit> {
    let title = career.title.to_lowercase();
    let skills: Vec<String> = career
        .required_skills
        .iter()
        .map(|s| s.to_lowercase())
        .collect();
    let categories: Vec<String> = career.interest_terms().map(str::to_lowercase).collect();

    needles
        .iter()
        .filter_map(|needle| {
            if title.contains(needle.as_str()) {
                Some(SearchHit::Title)
            } else if skills.iter().any(|s| s.contains(needle.as_str())) {
                Some(SearchHit::Skill)
            } else if categories.iter().any(|c| c.contains(needle.as_str())) {
                Some(SearchHit::Category)
            } else {
                None
            }
        })
        .min()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn career(id: &str, title: &str, category: &str, skills: &[&str]) -> CareerArchetype {
        CareerArchetype {
            id: id.to_string(),
            title: title.to_string(),
            category: category.to_string(),
            tags: vec![],
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            personality: PersonalityVector::from_scores([50.0; 6]).unwrap(),
            growth_trend: GrowthTrend::Stable,
            salary_band: SalaryBand {
                min_usd: 40_000,
                max_usd: 90_000,
            },
        }
    }

    fn sample() -> CareerCatalog {
        CareerCatalog::new(vec![
            career("c1", "Data Analyst", "Business", &["SQL", "Statistics"]),
            career("c2", "Nurse", "Healthcare", &["Patient care", "Data entry"]),
            career("c3", "Data Engineer", "Technology", &["Python", "SQL"]),
            career("c4", "Archivist", "Data", &["Cataloging"]),
        ])
        .unwrap()
    }

    fn ids(careers: &[Arc<CareerArchetype>]) -> Vec<&str> {
        careers.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_find_returns_archetype_or_not_found() {
        let catalog = sample();
        assert_eq!(catalog.find("c3").unwrap().title, "Data Engineer");
        assert!(matches!(catalog.find("nope"), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn test_search_orders_title_then_skill_then_category() {
        let catalog = sample();
        let results = catalog.search(&["data"]);
        // title hits c1, c3 (catalog order), skill hit c2, category hit c4
        assert_eq!(ids(&results), vec!["c1", "c3", "c2", "c4"]);
    }

    #[test]
    fn test_search_is_case_insensitive_and_uses_best_hit() {
        let catalog = sample();
        let results = catalog.search(&["PYTHON", "nurse"]);
        assert_eq!(ids(&results), vec!["c2", "c3"]);
    }

    #[test]
    fn test_search_with_blank_keywords_is_empty() {
        assert!(sample().search(&["  "]).is_empty());
        assert!(sample().search::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = CareerCatalog::new(vec![
            career("dup", "A", "X", &[]),
            career("dup", "B", "Y", &[]),
        ])
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn test_out_of_range_reference_vector_rejected() {
        let json = serde_json::json!({
            "id": "bad", "title": "Bad", "category": "X", "required_skills": [],
            "personality": {
                "realistic": 0, "investigative": 0, "artistic": 0,
                "social": 140, "enterprising": 0, "conventional": 0
            },
            "growth_trend": "stable",
            "salary_band": {"min_usd": 1, "max_usd": 2}
        });
        assert!(serde_json::from_value::<CareerArchetype>(json).is_err());
    }

    #[test]
    fn test_inverted_salary_band_rejected() {
        let mut bad = career("bad", "Bad", "X", &[]);
        bad.salary_band = SalaryBand {
            min_usd: 90_000,
            max_usd: 40_000,
        };
        assert!(CareerCatalog::new(vec![bad]).is_err());
    }

    #[test]
    fn test_vocabulary_contains_categories_and_tags() {
        let mut tagged = career("t", "Tagged", "Arts", &[]);
        tagged.tags = vec!["Design".to_string()];
        let catalog = CareerCatalog::new(vec![tagged]).unwrap();
        let vocabulary = catalog.vocabulary();
        assert!(vocabulary.contains("arts"));
        assert!(vocabulary.contains("design"));
    }

    #[test]
    fn test_growth_trend_parses_snake_case() {
        assert_eq!("high_growth".parse::<GrowthTrend>().unwrap(), GrowthTrend::HighGrowth);
        assert!("booming".parse::<GrowthTrend>().is_err());
    }
}
