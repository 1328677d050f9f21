//! Profile: the four free-text fields a user submits.

use serde::Deserialize;

use crate::errors::AppError;

/// Warning shown when a submission is missing any field.
pub const FILL_ALL_FIELDS: &str = "Please fill out all the fields.";

/// Ephemeral user input for one submission. Never persisted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub goals: String,
}

impl Profile {
    /// Names of the fields that are empty after trimming, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("education", &self.education),
            ("skills", &self.skills),
            ("interests", &self.interests),
            ("goals", &self.goals),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Rejects the profile unless all four fields are non-empty.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.missing_fields().is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(FILL_ALL_FIELDS.to_string()))
        }
    }
}
