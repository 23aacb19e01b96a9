//! Domain entities, validators, services, and ports.
//!
//! Types here are transport and storage agnostic. Invariants are
//! enforced by validated newtype constructors; adapters convert to and
//! from their own representations at the edges.

pub mod accounts;
pub mod application;
pub mod error;
pub mod forms;
pub mod job;
pub mod ports;
pub mod user;

pub use self::application::{
    Application, ApplicationId, ApplicationStatus, NewApplication, UnknownStatus,
};
pub use self::error::{Error, ErrorCode};
pub use self::job::{Job, JobChanges, JobId, NewJob};
pub use self::user::{
    EmailAddress, NewUser, PasswordHash, Role, User, UserId, UserValidationError, Username,
};
