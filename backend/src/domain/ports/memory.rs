//! In-memory store implementing every repository port.
//!
//! Backs handler tests and the demo mode: one `MemoryStore` behaves
//! like one database, so cascade deletes and uniqueness conflicts work
//! across the three repositories exactly as the SQL adapters do.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use pagination::{Page, PageRequest};

use crate::domain::{
    Application, ApplicationId, ApplicationStatus, EmailAddress, Job, JobChanges, JobId,
    NewApplication, NewJob, NewUser, Role, User, UserId, Username,
};

use super::{ApplicationRepository, JobRepository, StoreError, UserRepository};

#[derive(Default)]
struct State {
    users: Vec<User>,
    jobs: Vec<Job>,
    applications: Vec<Application>,
    next_user_id: i32,
    next_job_id: i32,
    next_application_id: i32,
}

/// Shared in-memory database implementing all repository ports.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock means a panic mid-test; propagating the
        // panic is the right behaviour there.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn newest_first(jobs: &mut [Job]) {
    jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(b.id.0.cmp(&a.id.0)));
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut state = self.lock();
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::conflict("username"));
        }
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::conflict("email"));
        }
        state.next_user_id += 1;
        let created = User {
            id: UserId(state.next_user_id),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.iter().find(|u| &u.email == email).cloned())
    }

    async fn username_exists(&self, username: &Username) -> Result<bool, StoreError> {
        Ok(self.lock().users.iter().any(|u| &u.username == username))
    }

    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, StoreError> {
        Ok(self.lock().users.iter().any(|u| &u.email == email))
    }

    async fn any_with_role(&self, role: Role) -> Result<bool, StoreError> {
        Ok(self.lock().users.iter().any(|u| u.role == role))
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.lock().users.clone())
    }
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn create(&self, job: NewJob) -> Result<Job, StoreError> {
        let mut state = self.lock();
        state.next_job_id += 1;
        let created = Job {
            id: JobId(state.next_job_id),
            title: job.title,
            description: job.description,
            location: job.location,
            company: job.company,
            salary: job.salary,
            author: job.author,
            posted_at: Utc::now(),
        };
        state.jobs.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.lock().jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn update(&self, id: JobId, changes: JobChanges) -> Result<Job, StoreError> {
        let mut state = self.lock();
        let job = state
            .jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or(StoreError::NotFound)?;
        job.title = changes.title;
        job.description = changes.description;
        job.location = changes.location;
        job.company = changes.company;
        job.salary = changes.salary;
        Ok(job.clone())
    }

    async fn delete(&self, id: JobId) -> Result<(), StoreError> {
        let mut state = self.lock();
        let before = state.jobs.len();
        state.jobs.retain(|j| j.id != id);
        if state.jobs.len() == before {
            return Err(StoreError::NotFound);
        }
        state.applications.retain(|a| a.job != id);
        Ok(())
    }

    async fn list_page(&self, request: PageRequest) -> Result<Page<Job>, StoreError> {
        let state = self.lock();
        let mut jobs = state.jobs.clone();
        newest_first(&mut jobs);
        let total = jobs.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = jobs
            .into_iter()
            .skip(offset)
            .take(request.per_page() as usize)
            .collect();
        Ok(Page::new(items, request, total))
    }

    async fn latest(&self, limit: i64) -> Result<Vec<Job>, StoreError> {
        let state = self.lock();
        let mut jobs = state.jobs.clone();
        newest_first(&mut jobs);
        jobs.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(jobs)
    }

    async fn list_by_author(&self, author: UserId) -> Result<Vec<Job>, StoreError> {
        let state = self.lock();
        let mut jobs: Vec<Job> = state
            .jobs
            .iter()
            .filter(|j| j.author == author)
            .cloned()
            .collect();
        newest_first(&mut jobs);
        Ok(jobs)
    }

    async fn list_all(&self) -> Result<Vec<Job>, StoreError> {
        let state = self.lock();
        let mut jobs = state.jobs.clone();
        newest_first(&mut jobs);
        Ok(jobs)
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn create(&self, application: NewApplication) -> Result<Application, StoreError> {
        let mut state = self.lock();
        if state
            .applications
            .iter()
            .any(|a| a.applicant == application.applicant && a.job == application.job)
        {
            return Err(StoreError::conflict("application"));
        }
        state.next_application_id += 1;
        let created = Application {
            id: ApplicationId(state.next_application_id),
            cover_letter: application.cover_letter,
            status: ApplicationStatus::Pending,
            job: application.job,
            applicant: application.applicant,
            applied_at: Utc::now(),
        };
        state.applications.push(created.clone());
        Ok(created)
    }

    async fn exists(&self, applicant: UserId, job: JobId) -> Result<bool, StoreError> {
        Ok(self
            .lock()
            .applications
            .iter()
            .any(|a| a.applicant == applicant && a.job == job))
    }

    async fn list_by_applicant(
        &self,
        applicant: UserId,
    ) -> Result<Vec<(Application, Job)>, StoreError> {
        let state = self.lock();
        let mut rows: Vec<(Application, Job)> = state
            .applications
            .iter()
            .filter(|a| a.applicant == applicant)
            .filter_map(|a| {
                state
                    .jobs
                    .iter()
                    .find(|j| j.id == a.job)
                    .map(|j| (a.clone(), j.clone()))
            })
            .collect();
        rows.sort_by(|a, b| b.0.applied_at.cmp(&a.0.applied_at).then(b.0.id.0.cmp(&a.0.id.0)));
        Ok(rows)
    }

    async fn list_for_employer(
        &self,
        employer: UserId,
    ) -> Result<Vec<(Application, Job)>, StoreError> {
        let state = self.lock();
        let mut rows: Vec<(Application, Job)> = state
            .applications
            .iter()
            .filter_map(|a| {
                state
                    .jobs
                    .iter()
                    .find(|j| j.id == a.job && j.author == employer)
                    .map(|j| (a.clone(), j.clone()))
            })
            .collect();
        rows.sort_by(|a, b| b.0.applied_at.cmp(&a.0.applied_at).then(b.0.id.0.cmp(&a.0.id.0)));
        Ok(rows)
    }

    async fn list_all(&self) -> Result<Vec<Application>, StoreError> {
        Ok(self.lock().applications.clone())
    }
}
