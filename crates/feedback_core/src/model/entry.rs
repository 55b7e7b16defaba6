//! Feedback entry model.
//!
//! # Responsibility
//! - Define the canonical persisted record and its summary projection.
//! - Provide the write/read-side validation shared by repository paths.
//!
//! # Invariants
//! - `id` is assigned by the store, monotonic and never reused.
//! - `created_at` is assigned once at insert time and never updated.
//! - Every text field is non-empty; `email` is syntactically valid.

use crate::model::sanitize::is_valid_email;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned entry identifier (auto-increment primary key).
pub type EntryId = i64;

/// One persisted feedback submission.
///
/// `message` may carry allow-listed formatting markup. It is stored and
/// returned verbatim; escaping is the renderer's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: EntryId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Listing projection of an entry. The message body is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub id: EntryId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Validated, normalized entry content that has not been persisted yet.
///
/// Built by [`SubmissionForm::validate`](crate::model::submission::SubmissionForm::validate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Structural violation of the entry invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    /// A required text column is empty.
    EmptyField(&'static str),
    /// `email` is not a syntactically valid address.
    InvalidEmail(String),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "entry field `{field}` must not be empty"),
            Self::InvalidEmail(value) => write!(f, "entry email `{value}` is not valid"),
        }
    }
}

impl Error for EntryValidationError {}

impl NewEntry {
    /// Checks entry invariants before persistence.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        check_columns(
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.subject,
            &self.message,
        )
    }
}

impl FeedbackEntry {
    /// Checks entry invariants on rows read back from storage.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        check_columns(
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.subject,
            &self.message,
        )
    }

    /// Returns the listing projection for this entry.
    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            created_at: self.created_at,
        }
    }
}

fn check_columns(
    first_name: &str,
    last_name: &str,
    email: &str,
    subject: &str,
    message: &str,
) -> Result<(), EntryValidationError> {
    for (column, value) in [
        ("first_name", first_name),
        ("last_name", last_name),
        ("email", email),
        ("subject", subject),
        ("message", message),
    ] {
        if value.trim().is_empty() {
            return Err(EntryValidationError::EmptyField(column));
        }
    }

    if !is_valid_email(email) {
        return Err(EntryValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}
