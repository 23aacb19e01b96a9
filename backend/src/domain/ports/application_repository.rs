//! Port abstraction for application persistence adapters.

use async_trait::async_trait;

use crate::domain::{Application, Job, JobId, NewApplication, UserId};

use super::StoreError;

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Persist a new application with status `Pending`.
    ///
    /// Returns [`StoreError::Conflict`] when the (applicant, job)
    /// unique constraint rejects a duplicate.
    async fn create(&self, application: NewApplication) -> Result<Application, StoreError>;

    /// Fast-path duplicate pre-check before applying.
    async fn exists(&self, applicant: UserId, job: JobId) -> Result<bool, StoreError>;

    /// Applications submitted by `applicant`, newest first, joined
    /// with their job for display.
    async fn list_by_applicant(&self, applicant: UserId)
        -> Result<Vec<(Application, Job)>, StoreError>;

    /// Applications received across every job owned by `employer`,
    /// newest first, joined with the job they target.
    async fn list_for_employer(&self, employer: UserId)
        -> Result<Vec<(Application, Job)>, StoreError>;

    /// Every application, for the admin dashboard.
    async fn list_all(&self) -> Result<Vec<Application>, StoreError>;
}
