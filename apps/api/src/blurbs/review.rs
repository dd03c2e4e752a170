//! Review State Machine: status transitions and text resolution for candidate blurbs.
//!
//! Every status may currently move to every other status (including itself); a
//! rejected blurb can be un-rejected and nothing is terminal. Transitions still go
//! through `can_transition_to` so the graph can be narrowed in one place.
//!
//! Editing and status are independent axes. They only meet in `Blurb::effective_text`:
//! - modified → `user_text` (an empty string is a valid edit)
//! - pending / accepted → `suggestion_text`
//! - rejected → nothing

use chrono::Utc;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::blurb::{Blurb, BlurbStatus};

impl BlurbStatus {
    pub fn allowed_transitions(self) -> &'static [BlurbStatus] {
        &BlurbStatus::ALL
    }

    pub fn can_transition_to(self, next: BlurbStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Whether a blurb in this status takes part in compilation at all.
    pub fn contributes_text(self) -> bool {
        self != BlurbStatus::Rejected
    }
}

/// Request body for `PATCH /api/v1/blurbs/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub status: String,
    #[serde(default)]
    pub user_text: Option<String>,
}

/// A validated review decision, ready to be applied to a blurb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub status: BlurbStatus,
    /// `None` keeps whatever text the blurb already carries.
    pub user_text: Option<String>,
}

impl Review {
    pub fn new(status: BlurbStatus, user_text: Option<String>) -> Result<Self, AppError> {
        if status == BlurbStatus::Modified && user_text.is_none() {
            return Err(AppError::Validation(
                "user_text is required when status is 'modified'".to_string(),
            ));
        }
        Ok(Self { status, user_text })
    }

    /// Checks the transition from `current` against the status graph.
    pub fn check_transition(&self, current: BlurbStatus) -> Result<(), AppError> {
        if current.can_transition_to(self.status) {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Cannot move a blurb from '{current}' to '{}'",
                self.status
            )))
        }
    }

    pub fn apply_to(&self, blurb: &mut Blurb) {
        blurb.status = self.status;
        if let Some(text) = &self.user_text {
            blurb.user_text = Some(text.clone());
        }
        blurb.updated_at = Utc::now();
    }
}

impl TryFrom<ReviewRequest> for Review {
    type Error = AppError;

    fn try_from(request: ReviewRequest) -> Result<Self, Self::Error> {
        Review::new(request.status.parse()?, request.user_text)
    }
}

impl Blurb {
    /// The single text this blurb contributes to a compiled CV, if any.
    pub fn effective_text(&self) -> Option<&str> {
        match self.status {
            BlurbStatus::Rejected => None,
            BlurbStatus::Modified => Some(
                self.user_text
                    .as_deref()
                    .unwrap_or(self.suggestion_text.as_str()),
            ),
            BlurbStatus::Pending | BlurbStatus::Accepted => Some(self.suggestion_text.as_str()),
        }
    }
}

/// Picks the blurb that represents a field: the most recently created one that is not
/// rejected. `blurbs` must be in creation order. Recency wins over status, so a newer
/// pending blurb outranks an older accepted one.
pub fn select_effective(blurbs: &[Blurb]) -> Option<&Blurb> {
    blurbs.iter().rev().find(|b| b.status.contributes_text())
}

/// Resolved text for a field; empty when no blurb qualifies.
pub fn resolve_text(blurbs: &[Blurb]) -> String {
    select_effective(blurbs)
        .and_then(Blurb::effective_text)
        .unwrap_or_default()
        .to_string()
}
