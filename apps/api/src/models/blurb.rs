use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// Review status of a candidate blurb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurbStatus {
    Pending,
    Accepted,
    Modified,
    Rejected,
}

impl BlurbStatus {
    pub const ALL: [BlurbStatus; 4] = [
        BlurbStatus::Pending,
        BlurbStatus::Accepted,
        BlurbStatus::Modified,
        BlurbStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlurbStatus::Pending => "pending",
            BlurbStatus::Accepted => "accepted",
            BlurbStatus::Modified => "modified",
            BlurbStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for BlurbStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlurbStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlurbStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Invalid status '{s}'")))
    }
}

/// One generated (and possibly user-edited) candidate for a CV field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blurb {
    pub id: Uuid,
    pub template_name: String,
    pub field_key: String,
    pub suggestion_text: String,
    /// Absent until a reviewer supplies text. `Some("")` is a real edit.
    pub user_text: Option<String>,
    pub status: BlurbStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blurb {
    /// A fresh pending candidate straight from the generation service.
    pub fn pending(template_name: &str, field_key: &str, suggestion_text: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            template_name: template_name.to_string(),
            field_key: field_key.to_string(),
            suggestion_text,
            user_text: None,
            status: BlurbStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Row shape of the `blurbs` table. `status` is kept as TEXT.
#[derive(Debug, Clone, FromRow)]
pub struct BlurbRow {
    pub id: Uuid,
    pub template_name: String,
    pub field_key: String,
    pub suggestion_text: String,
    pub user_text: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BlurbRow> for Blurb {
    type Error = AppError;

    fn try_from(row: BlurbRow) -> Result<Self, Self::Error> {
        Ok(Blurb {
            status: row.status.parse()?,
            id: row.id,
            template_name: row.template_name,
            field_key: row.field_key,
            suggestion_text: row.suggestion_text,
            user_text: row.user_text,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
