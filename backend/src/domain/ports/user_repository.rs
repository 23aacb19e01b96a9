//! Port abstraction for user persistence adapters.

use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, Role, User, UserId, Username};

use super::StoreError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account and return it with its assigned id.
    ///
    /// Returns [`StoreError::Conflict`] when the unique constraint on
    /// username or email rejects the insert.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Fetch an account by login email.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError>;

    /// Fast-path uniqueness pre-check for registration.
    async fn username_exists(&self, username: &Username) -> Result<bool, StoreError>;

    /// Fast-path uniqueness pre-check for registration.
    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, StoreError>;

    /// Whether any account with `role` exists. Used by admin seeding.
    async fn any_with_role(&self, role: Role) -> Result<bool, StoreError>;

    /// Every registered account, for the admin dashboard.
    async fn list_all(&self) -> Result<Vec<User>, StoreError>;
}
