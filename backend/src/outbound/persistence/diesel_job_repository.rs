//! Diesel-backed `JobRepository` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::{Page, PageRequest};

use crate::domain::ports::{JobRepository, StoreError};
use crate::domain::{Job, JobChanges, JobId, NewJob, UserId};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{JobRow, NewJobRow};
use super::pool::DbPool;
use super::schema::{applications, jobs};

/// PostgreSQL persistence for job postings.
#[derive(Clone)]
pub struct DieselJobRepository {
    pool: DbPool,
}

impl DieselJobRepository {
    /// Create a repository backed by the shared pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for DieselJobRepository {
    async fn create(&self, job: NewJob) -> Result<Job, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewJobRow {
            title: job.title,
            description: job.description,
            salary: job.salary,
            location: job.location,
            company: job.company,
            user_id: job.author.0,
        };
        let inserted: JobRow = diesel::insert_into(jobs::table)
            .values(&row)
            .returning(JobRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted.into())
    }

    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<JobRow> = jobs::table
            .find(id.0)
            .select(JobRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Job::from))
    }

    async fn update(&self, id: JobId, changes: JobChanges) -> Result<Job, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated: Option<JobRow> = diesel::update(jobs::table.find(id.0))
            .set((
                jobs::title.eq(changes.title),
                jobs::description.eq(changes.description),
                jobs::location.eq(changes.location),
                jobs::company.eq(changes.company),
                jobs::salary.eq(changes.salary),
            ))
            .returning(JobRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        updated.map(Job::from).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: JobId) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // One transaction: either the job and all its applications go,
        // or nothing does.
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::delete(applications::table.filter(applications::job_id.eq(id.0)))
                    .execute(conn)
                    .await?;
                let deleted = diesel::delete(jobs::table.find(id.0)).execute(conn).await?;
                if deleted == 0 {
                    return Err(diesel::result::Error::NotFound);
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn list_page(&self, request: PageRequest) -> Result<Page<Job>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = jobs::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<JobRow> = jobs::table
            .order((jobs::date_posted.desc(), jobs::id.desc()))
            .offset(request.offset())
            .limit(request.limit())
            .select(JobRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = rows.into_iter().map(Job::from).collect();
        Ok(Page::new(items, request, u64::try_from(total).unwrap_or(0)))
    }

    async fn latest(&self, limit: i64) -> Result<Vec<Job>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<JobRow> = jobs::table
            .order((jobs::date_posted.desc(), jobs::id.desc()))
            .limit(limit)
            .select(JobRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn list_by_author(&self, author: UserId) -> Result<Vec<Job>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<JobRow> = jobs::table
            .filter(jobs::user_id.eq(author.0))
            .order((jobs::date_posted.desc(), jobs::id.desc()))
            .select(JobRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<Job>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<JobRow> = jobs::table
            .order((jobs::date_posted.desc(), jobs::id.desc()))
            .select(JobRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Job::from).collect())
    }
}
