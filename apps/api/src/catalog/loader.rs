use std::path::Path;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::catalog::{CareerArchetype, CareerCatalog, SalaryBand};
use crate::errors::CoreError;
use crate::models::career::CareerRow;
use crate::personality::PersonalityVector;

impl CareerCatalog {
    /// Loads a catalog from a JSON array of career archetypes.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let careers: Vec<CareerArchetype> = serde_json::from_str(&raw)
            .with_context(|| format!("Catalog file {} is not valid JSON", path.display()))?;
        let catalog = CareerCatalog::new(careers)
            .with_context(|| format!("Catalog file {} failed validation", path.display()))?;

        info!("Loaded {} careers from {}", catalog.len(), path.display());
        Ok(catalog)
    }
}

/// Loads the catalog from the `careers` table, in id order.
pub async fn load_catalog_from_db(pool: &PgPool) -> Result<CareerCatalog> {
    let rows = sqlx::query_as::<_, CareerRow>(
        r#"
        SELECT id, title, category, tags, required_skills,
               realistic, investigative, artistic, social, enterprising, conventional,
               growth_trend, salary_min_usd, salary_max_usd
        FROM careers
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to query careers table")?;

    let careers = rows
        .into_iter()
        .map(archetype_from_row)
        .collect::<Result<Vec<_>, CoreError>>()
        .context("careers table contains an invalid row")?;

    let catalog = CareerCatalog::new(careers).context("careers table failed validation")?;
    info!("Loaded {} careers from PostgreSQL", catalog.len());
    Ok(catalog)
}

fn archetype_from_row(row: CareerRow) -> Result<CareerArchetype, CoreError> {
    let personality = PersonalityVector::from_scores([
        row.realistic,
        row.investigative,
        row.artistic,
        row.social,
        row.enterprising,
        row.conventional,
    ])?;

    let salary_band = SalaryBand {
        min_usd: u32::try_from(row.salary_min_usd).map_err(|_| {
            CoreError::InvalidArgument(format!("career '{}' has a negative salary", row.id))
        })?,
        max_usd: u32::try_from(row.salary_max_usd).map_err(|_| {
            CoreError::InvalidArgument(format!("career '{}' has a negative salary", row.id))
        })?,
    };

    Ok(CareerArchetype {
        growth_trend: row.growth_trend.parse()?,
        id: row.id,
        title: row.title,
        category: row.category,
        tags: row.tags,
        required_skills: row.required_skills,
        personality,
        salary_band,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GrowthTrend;
    use crate::personality::Category;
    use std::io::Write;

    const CATALOG_JSON: &str = r#"[
        {
            "id": "ux-researcher",
            "title": "UX Researcher",
            "category": "Design",
            "tags": ["research", "psychology"],
            "required_skills": ["interviewing", "usability testing"],
            "personality": {
                "realistic": 10, "investigative": 80, "artistic": 70,
                "social": 65, "enterprising": 30, "conventional": 35
            },
            "growth_trend": "growing",
            "salary_band": {"min_usd": 70000, "max_usd": 140000}
        }
    ]"#;

    #[test]
    fn test_from_json_file_loads_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG_JSON.as_bytes()).unwrap();

        let catalog = CareerCatalog::from_json_file(file.path()).unwrap();
        let career = catalog.find("ux-researcher").unwrap();
        assert_eq!(career.growth_trend, GrowthTrend::Growing);
        assert_eq!(career.personality.get(Category::Investigative), 80.0);
    }

    #[test]
    fn test_from_json_file_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[{\"id\": ").unwrap();
        assert!(CareerCatalog::from_json_file(file.path()).is_err());
    }

    #[test]
    fn test_from_json_file_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CareerCatalog::from_json_file(&dir.path().join("absent.json")).is_err());
    }

    fn row() -> CareerRow {
        CareerRow {
            id: "welder".to_string(),
            title: "Welder".to_string(),
            category: "Skilled Trades".to_string(),
            tags: vec!["hands-on".to_string()],
            required_skills: vec!["welding".to_string()],
            realistic: 95.0,
            investigative: 30.0,
            artistic: 20.0,
            social: 15.0,
            enterprising: 20.0,
            conventional: 50.0,
            growth_trend: "stable".to_string(),
            salary_min_usd: 38_000,
            salary_max_usd: 70_000,
        }
    }

    #[test]
    fn test_archetype_from_row_maps_vector_and_band() {
        let career = archetype_from_row(row()).unwrap();
        assert_eq!(career.personality.get(Category::Realistic), 95.0);
        assert_eq!(career.salary_band.max_usd, 70_000);
        assert_eq!(career.growth_trend, GrowthTrend::Stable);
    }

    #[test]
    fn test_archetype_from_row_rejects_negative_salary() {
        let mut bad = row();
        bad.salary_min_usd = -1;
        assert!(archetype_from_row(bad).is_err());
    }
}
