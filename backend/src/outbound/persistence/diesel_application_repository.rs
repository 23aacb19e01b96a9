//! Diesel-backed `ApplicationRepository` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ApplicationRepository, StoreError};
use crate::domain::{Application, ApplicationStatus, Job, JobId, NewApplication, UserId};

use super::diesel_helpers::{map_corrupt_row, map_diesel_error, map_pool_error};
use super::models::{ApplicationRow, JobRow, NewApplicationRow};
use super::pool::DbPool;
use super::schema::{applications, jobs};

/// PostgreSQL persistence for job applications.
#[derive(Clone)]
pub struct DieselApplicationRepository {
    pool: DbPool,
}

impl DieselApplicationRepository {
    /// Create a repository backed by the shared pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_domain_pairs(
    rows: Vec<(ApplicationRow, JobRow)>,
) -> Result<Vec<(Application, Job)>, StoreError> {
    rows.into_iter()
        .map(|(application, job)| {
            Application::try_from(application)
                .map(|application| (application, Job::from(job)))
                .map_err(map_corrupt_row)
        })
        .collect()
}

#[async_trait]
impl ApplicationRepository for DieselApplicationRepository {
    async fn create(&self, application: NewApplication) -> Result<Application, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewApplicationRow {
            cover_letter: application.cover_letter,
            status: ApplicationStatus::Pending.as_str().to_owned(),
            job_id: application.job.0,
            user_id: application.applicant.0,
        };
        let inserted: ApplicationRow = diesel::insert_into(applications::table)
            .values(&row)
            .returning(ApplicationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Application::try_from(inserted).map_err(map_corrupt_row)
    }

    async fn exists(&self, applicant: UserId, job: JobId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            applications::table
                .filter(applications::user_id.eq(applicant.0))
                .filter(applications::job_id.eq(job.0)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn list_by_applicant(
        &self,
        applicant: UserId,
    ) -> Result<Vec<(Application, Job)>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(ApplicationRow, JobRow)> = applications::table
            .inner_join(jobs::table)
            .filter(applications::user_id.eq(applicant.0))
            .order((applications::date_applied.desc(), applications::id.desc()))
            .select((ApplicationRow::as_select(), JobRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_domain_pairs(rows)
    }

    async fn list_for_employer(
        &self,
        employer: UserId,
    ) -> Result<Vec<(Application, Job)>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(ApplicationRow, JobRow)> = applications::table
            .inner_join(jobs::table)
            .filter(jobs::user_id.eq(employer.0))
            .order((applications::date_applied.desc(), applications::id.desc()))
            .select((ApplicationRow::as_select(), JobRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_domain_pairs(rows)
    }

    async fn list_all(&self) -> Result<Vec<Application>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ApplicationRow> = applications::table
            .order(applications::id.asc())
            .select(ApplicationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| Application::try_from(row).map_err(map_corrupt_row))
            .collect()
    }
}
