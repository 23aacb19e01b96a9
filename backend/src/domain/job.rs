//! Job posting model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// Stable job identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub i32);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A posted job.
///
/// ## Invariants
/// - `author` held the employer role when the job was created; the
///   store does not re-validate this later.
/// - `posted_at` is set from the server clock at creation and never
///   changes, including across edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub company: String,
    /// Free-text salary, e.g. "£40k–£55k" or "negotiable".
    pub salary: Option<String>,
    pub author: UserId,
    pub posted_at: DateTime<Utc>,
}

/// A validated posting ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub location: String,
    pub company: String,
    pub salary: Option<String>,
    pub author: UserId,
}

/// Field updates applied by the edit action.
///
/// Ownership and the posting timestamp are not editable.
#[derive(Debug, Clone)]
pub struct JobChanges {
    pub title: String,
    pub description: String,
    pub location: String,
    pub company: String,
    pub salary: Option<String>,
}
