//! Candidate context: the read-only record a generation prompt is built from.
//!
//! The profile, experience, project and job analysis records are owned by the CRUD
//! layer. `ContextSource` is the seam through which the coordinator reads them.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;

use crate::models::profile::{ExperienceRow, JobAnalysisRow, ProfileRow, ProjectRow};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: Option<String>,
}

impl CandidateProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    /// work, education, hobby, ...
    #[serde(default)]
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
}

/// Keywords and focus areas from the active job analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFocus {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

impl JobFocus {
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.focus_areas.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateContext {
    #[serde(default)]
    pub profile: CandidateProfile,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub job_focus: Option<JobFocus>,
}

#[async_trait]
pub trait ContextSource: Send + Sync {
    async fn load(&self) -> Result<CandidateContext>;
}

/// A fixed context, typically read once from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct StaticContextSource {
    context: CandidateContext,
}

impl StaticContextSource {
    pub fn new(context: CandidateContext) -> Self {
        Self { context }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read candidate context {}", path.display()))?;
        let context = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid candidate context {}", path.display()))?;
        Ok(Self::new(context))
    }
}

#[async_trait]
impl ContextSource for StaticContextSource {
    async fn load(&self) -> Result<CandidateContext> {
        Ok(self.context.clone())
    }
}

/// Reads the CRUD layer's tables. Never writes.
#[derive(Clone)]
pub struct PgContextSource {
    pool: PgPool,
}

impl PgContextSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContextSource for PgContextSource {
    async fn load(&self) -> Result<CandidateContext> {
        let profile = sqlx::query_as::<_, ProfileRow>(
            "SELECT first_name, last_name, bio FROM about_you LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load profile")?;

        let experiences = sqlx::query_as::<_, ExperienceRow>(
            r#"
            SELECT category, title, organization, start_date, end_date, description
            FROM experiences
            ORDER BY sort_order
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load experiences")?;

        let projects = sqlx::query_as::<_, ProjectRow>(
            "SELECT title, description, keywords FROM projects ORDER BY sort_order",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load projects")?;

        let analysis = sqlx::query_as::<_, JobAnalysisRow>(
            r#"
            SELECT extracted_keywords, focus_suggestions
            FROM job_analyses
            WHERE is_active
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load active job analysis")?;

        Ok(CandidateContext {
            profile: profile.map(CandidateProfile::from).unwrap_or_default(),
            experiences: experiences.into_iter().map(Experience::from).collect(),
            projects: projects.into_iter().map(Project::from).collect(),
            job_focus: analysis.map(JobFocus::from).filter(|f| !f.is_empty()),
        })
    }
}

impl From<ProfileRow> for CandidateProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            first_name: row.first_name,
            last_name: row.last_name,
            bio: row.bio,
        }
    }
}

impl From<ExperienceRow> for Experience {
    fn from(row: ExperienceRow) -> Self {
        Self {
            category: row.category,
            title: row.title,
            organization: row.organization,
            start_date: row.start_date,
            end_date: row.end_date,
            description: row.description,
        }
    }
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            title: row.title,
            description: row.description,
            keywords: row.keywords,
        }
    }
}

impl From<JobAnalysisRow> for JobFocus {
    fn from(row: JobAnalysisRow) -> Self {
        Self {
            keywords: string_list(row.extracted_keywords),
            focus_areas: string_list(row.focus_suggestions),
        }
    }
}

/// Reads a JSON array of strings. Also accepts the array encoded as a JSON string,
/// which is how older rows stored it. Anything else yields an empty list.
fn string_list(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(encoded)) => {
            string_list(serde_json::from_str::<Value>(&encoded).ok())
        }
        _ => Vec::new(),
    }
}
