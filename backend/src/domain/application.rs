//! Job application model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{JobId, UserId};

/// Stable application identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub i32);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review status of an application.
///
/// Only `Pending` is reachable today: applications are created pending
/// and no route transitions them. The enum exists so a review flow can
/// be added without a storage migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
}

impl ApplicationStatus {
    /// Storage encoding for the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
        }
    }

    /// Parse a stored status string.
    pub fn parse(value: &str) -> Result<Self, UnknownStatus> {
        match value {
            "Pending" => Ok(Self::Pending),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored status string that no known variant matches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status: {0}")]
pub struct UnknownStatus(pub String);

/// A jobseeker's application to one job.
///
/// ## Invariants
/// - At most one application exists per (applicant, job) pair.
/// - Applications are never updated; they are deleted only when their
///   job is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub id: ApplicationId,
    pub cover_letter: String,
    pub status: ApplicationStatus,
    pub job: JobId,
    pub applicant: UserId,
    pub applied_at: DateTime<Utc>,
}

/// A validated application ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub cover_letter: String,
    pub job: JobId,
    pub applicant: UserId,
}
