//! Row types bridging Diesel and the domain entities.
//!
//! Reads go through `TryFrom` so malformed stored values (an unknown
//! role or status string) surface as query errors instead of panics.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Application, ApplicationStatus, EmailAddress, Job, JobId, PasswordHash, Role, User, UserId,
    Username,
};

use super::schema::{applications, jobs, users};

/// Raised when a stored row violates a domain invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {entity} row {id} is invalid: {message}")]
pub struct CorruptRow {
    pub entity: &'static str,
    pub id: i32,
    pub message: String,
}

impl CorruptRow {
    fn new(entity: &'static str, id: i32, message: impl Into<String>) -> Self {
        Self {
            entity,
            id,
            message: message.into(),
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = CorruptRow;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::new(&row.username)
            .map_err(|err| CorruptRow::new("user", row.id, err.to_string()))?;
        let email = EmailAddress::new(&row.email)
            .map_err(|err| CorruptRow::new("user", row.id, err.to_string()))?;
        let role = Role::parse(&row.role)
            .map_err(|err| CorruptRow::new("user", row.id, err.to_string()))?;
        Ok(Self {
            id: UserId(row.id),
            username,
            email,
            password_hash: PasswordHash::new(row.password_hash),
            role,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub salary: Option<String>,
    pub location: String,
    pub company: String,
    pub user_id: i32,
    pub date_posted: DateTime<Utc>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Self {
            id: JobId(row.id),
            title: row.title,
            description: row.description,
            location: row.location,
            company: row.company,
            salary: row.salary,
            author: UserId(row.user_id),
            posted_at: row.date_posted,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = jobs)]
pub struct NewJobRow {
    pub title: String,
    pub description: String,
    pub salary: Option<String>,
    pub location: String,
    pub company: String,
    pub user_id: i32,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApplicationRow {
    pub id: i32,
    pub cover_letter: String,
    pub status: String,
    pub job_id: i32,
    pub user_id: i32,
    pub date_applied: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = CorruptRow;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let status = ApplicationStatus::parse(&row.status)
            .map_err(|err| CorruptRow::new("application", row.id, err.to_string()))?;
        Ok(Self {
            id: crate::domain::ApplicationId(row.id),
            cover_letter: row.cover_letter,
            status,
            job: JobId(row.job_id),
            applicant: UserId(row.user_id),
            applied_at: row.date_applied,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = applications)]
pub struct NewApplicationRow {
    pub cover_letter: String,
    pub status: String,
    pub job_id: i32,
    pub user_id: i32,
}
