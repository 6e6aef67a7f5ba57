// Built-in career archetypes used when no external catalog source is configured.
// Reference vectors are typical RIASEC interest profiles for each occupation.

use crate::catalog::{CareerArchetype, CareerCatalog, GrowthTrend, SalaryBand};
use crate::errors::CoreError;
use crate::personality::PersonalityVector;

struct Seed {
    id: &'static str,
    title: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    skills: &'static [&'static str],
    /// R, I, A, S, E, C
    riasec: [f64; 6],
    growth: GrowthTrend,
    salary: (u32, u32),
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "software-engineer",
        title: "Software Engineer",
        category: "Technology",
        tags: &["programming", "computers", "problem solving"],
        skills: &["programming", "algorithms", "debugging", "version control"],
        riasec: [45.0, 90.0, 40.0, 25.0, 35.0, 60.0],
        growth: GrowthTrend::HighGrowth,
        salary: (85_000, 180_000),
    },
    Seed {
        id: "data-scientist",
        title: "Data Scientist",
        category: "Technology",
        tags: &["statistics", "research", "computers"],
        skills: &["statistics", "python", "machine learning", "data visualization"],
        riasec: [25.0, 95.0, 35.0, 25.0, 40.0, 65.0],
        growth: GrowthTrend::HighGrowth,
        salary: (90_000, 170_000),
    },
    Seed {
        id: "mechanical-engineer",
        title: "Mechanical Engineer",
        category: "Engineering",
        tags: &["machines", "design", "physics"],
        skills: &["cad", "physics", "mathematics", "prototyping"],
        riasec: [90.0, 85.0, 35.0, 20.0, 35.0, 50.0],
        growth: GrowthTrend::Growing,
        salary: (70_000, 130_000),
    },
    Seed {
        id: "electrician",
        title: "Electrician",
        category: "Skilled Trades",
        tags: &["hands-on", "construction", "machines"],
        skills: &["wiring", "blueprint reading", "safety compliance", "troubleshooting"],
        riasec: [95.0, 50.0, 15.0, 25.0, 30.0, 55.0],
        growth: GrowthTrend::Growing,
        salary: (45_000, 95_000),
    },
    Seed {
        id: "graphic-designer",
        title: "Graphic Designer",
        category: "Arts",
        tags: &["design", "visual arts", "creativity"],
        skills: &["typography", "illustration", "layout", "adobe creative suite"],
        riasec: [30.0, 30.0, 95.0, 30.0, 45.0, 40.0],
        growth: GrowthTrend::Stable,
        salary: (40_000, 85_000),
    },
    Seed {
        id: "writer",
        title: "Writer",
        category: "Arts",
        tags: &["writing", "media", "creativity"],
        skills: &["writing", "editing", "research", "storytelling"],
        riasec: [10.0, 55.0, 95.0, 35.0, 35.0, 30.0],
        growth: GrowthTrend::Stable,
        salary: (38_000, 90_000),
    },
    Seed {
        id: "registered-nurse",
        title: "Registered Nurse",
        category: "Healthcare",
        tags: &["medicine", "helping people", "biology"],
        skills: &["patient care", "communication", "anatomy", "record keeping"],
        riasec: [45.0, 65.0, 20.0, 95.0, 30.0, 50.0],
        growth: GrowthTrend::Growing,
        salary: (60_000, 110_000),
    },
    Seed {
        id: "teacher",
        title: "Teacher",
        category: "Education",
        tags: &["teaching", "helping people", "communication"],
        skills: &["communication", "lesson planning", "classroom management", "mentoring"],
        riasec: [20.0, 45.0, 50.0, 95.0, 45.0, 40.0],
        growth: GrowthTrend::Stable,
        salary: (42_000, 80_000),
    },
    Seed {
        id: "counselor",
        title: "School Counselor",
        category: "Education",
        tags: &["psychology", "helping people", "mentoring"],
        skills: &["active listening", "communication", "counseling", "mentoring"],
        riasec: [10.0, 50.0, 40.0, 95.0, 40.0, 35.0],
        growth: GrowthTrend::Growing,
        salary: (45_000, 85_000),
    },
    Seed {
        id: "marketing-manager",
        title: "Marketing Manager",
        category: "Business",
        tags: &["marketing", "media", "leadership"],
        skills: &["communication", "market research", "negotiation", "budgeting"],
        riasec: [15.0, 40.0, 60.0, 50.0, 95.0, 45.0],
        growth: GrowthTrend::Growing,
        salary: (65_000, 150_000),
    },
    Seed {
        id: "entrepreneur",
        title: "Entrepreneur",
        category: "Business",
        tags: &["leadership", "startups", "sales"],
        skills: &["negotiation", "budgeting", "leadership", "sales"],
        riasec: [35.0, 45.0, 50.0, 45.0, 95.0, 40.0],
        growth: GrowthTrend::Stable,
        salary: (30_000, 200_000),
    },
    Seed {
        id: "lawyer",
        title: "Lawyer",
        category: "Law",
        tags: &["law", "debate", "research"],
        skills: &["legal research", "writing", "negotiation", "public speaking"],
        riasec: [10.0, 65.0, 35.0, 45.0, 90.0, 60.0],
        growth: GrowthTrend::Stable,
        salary: (70_000, 200_000),
    },
    Seed {
        id: "accountant",
        title: "Accountant",
        category: "Finance",
        tags: &["finance", "mathematics", "organization"],
        skills: &["bookkeeping", "spreadsheets", "tax preparation", "auditing"],
        riasec: [15.0, 50.0, 10.0, 25.0, 45.0, 95.0],
        growth: GrowthTrend::Stable,
        salary: (55_000, 110_000),
    },
    Seed {
        id: "lab-technician",
        title: "Laboratory Technician",
        category: "Science",
        tags: &["biology", "chemistry", "research"],
        skills: &["lab safety", "sample analysis", "record keeping", "microscopy"],
        riasec: [65.0, 85.0, 15.0, 20.0, 15.0, 75.0],
        growth: GrowthTrend::Growing,
        salary: (40_000, 75_000),
    },
    Seed {
        id: "architect",
        title: "Architect",
        category: "Engineering",
        tags: &["design", "construction", "visual arts"],
        skills: &["cad", "drawing", "mathematics", "project management"],
        riasec: [60.0, 70.0, 85.0, 25.0, 45.0, 45.0],
        growth: GrowthTrend::Stable,
        salary: (60_000, 140_000),
    },
    Seed {
        id: "office-administrator",
        title: "Office Administrator",
        category: "Business",
        tags: &["organization", "administration"],
        skills: &["spreadsheets", "scheduling", "record keeping", "communication"],
        riasec: [20.0, 25.0, 15.0, 50.0, 45.0, 90.0],
        growth: GrowthTrend::Declining,
        salary: (35_000, 65_000),
    },
];

/// Builds the built-in catalog.
pub fn builtin_catalog() -> Result<CareerCatalog, CoreError> {
    let careers = SEEDS
        .iter()
        .map(|seed| {
            Ok(CareerArchetype {
                id: seed.id.to_string(),
                title: seed.title.to_string(),
                category: seed.category.to_string(),
                tags: seed.tags.iter().map(|t| t.to_string()).collect(),
                required_skills: seed.skills.iter().map(|s| s.to_string()).collect(),
                personality: PersonalityVector::from_scores(seed.riasec)?,
                growth_trend: seed.growth,
                salary_band: SalaryBand {
                    min_usd: seed.salary.0,
                    max_usd: seed.salary.1,
                },
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    CareerCatalog::new(careers)
}
