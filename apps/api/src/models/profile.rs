//! Rows of the candidate record tables. These tables are owned by the CRUD layer;
//! this service only reads them to build generation prompts.

use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ExperienceRow {
    pub category: String,
    pub title: String,
    pub organization: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub title: String,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

/// The active job analysis. Both columns hold JSON arrays of strings.
#[derive(Debug, Clone, FromRow)]
pub struct JobAnalysisRow {
    pub extracted_keywords: Option<Value>,
    pub focus_suggestions: Option<Value>,
}
