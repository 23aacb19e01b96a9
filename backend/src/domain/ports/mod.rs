//! Ports: the traits the domain needs implemented by adapters.
//!
//! Persistence adapters (Diesel, in-memory) implement the repository
//! traits; the bcrypt adapter implements [`PasswordHasher`]. Handlers
//! depend only on these traits via the shared HTTP state.

mod application_repository;
mod job_repository;
pub mod memory;
mod password_hasher;
mod user_repository;

pub use application_repository::ApplicationRepository;
pub use job_repository::JobRepository;
pub use password_hasher::PasswordHasher;
pub use user_repository::UserRepository;

/// Failures raised by store adapters.
///
/// `Conflict` is the storage-level uniqueness backstop: pre-checks in
/// the services are a fast path, but a concurrent writer can still win
/// the race, and the unique constraint reports it here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store connection failed: {message}")]
    Connection { message: String },
    /// A query or mutation failed during execution.
    #[error("store query failed: {message}")]
    Query { message: String },
    /// A unique constraint rejected the write.
    #[error("conflict on {field}")]
    Conflict { field: String },
    /// The targeted record does not exist.
    #[error("record not found")]
    NotFound,
}

impl StoreError {
    /// Connection failure with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query failure with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Unique-constraint conflict attributed to `field`.
    pub fn conflict(field: impl Into<String>) -> Self {
        Self::Conflict {
            field: field.into(),
        }
    }
}
