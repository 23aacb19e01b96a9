//! Diesel-backed persistence adapters for PostgreSQL.

mod diesel_application_repository;
mod diesel_helpers;
mod diesel_job_repository;
mod diesel_user_repository;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_application_repository::DieselApplicationRepository;
pub use diesel_job_repository::DieselJobRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
