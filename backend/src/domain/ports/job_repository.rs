//! Port abstraction for job persistence adapters.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Job, JobChanges, JobId, NewJob, UserId};

use super::StoreError;

#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Persist a new posting and return it with its assigned id and
    /// server-clock timestamp.
    async fn create(&self, job: NewJob) -> Result<Job, StoreError>;

    /// Fetch a posting by identifier.
    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>, StoreError>;

    /// Apply edited fields to an existing posting.
    ///
    /// Returns [`StoreError::NotFound`] when the posting vanished
    /// between the handler's fetch and the write.
    async fn update(&self, id: JobId, changes: JobChanges) -> Result<Job, StoreError>;

    /// Delete a posting and, in the same transaction, every
    /// application that references it.
    async fn delete(&self, id: JobId) -> Result<(), StoreError>;

    /// One page of postings, newest first.
    async fn list_page(&self, request: PageRequest) -> Result<Page<Job>, StoreError>;

    /// The `limit` newest postings, for the home page.
    async fn latest(&self, limit: i64) -> Result<Vec<Job>, StoreError>;

    /// Postings owned by `author`, newest first.
    async fn list_by_author(&self, author: UserId) -> Result<Vec<Job>, StoreError>;

    /// Every posting, for the admin dashboard.
    async fn list_all(&self) -> Result<Vec<Job>, StoreError>;
}
