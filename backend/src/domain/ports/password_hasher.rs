//! Port abstraction for the credential store.

use async_trait::async_trait;

use crate::domain::{Error, PasswordHash};

/// One-way salted password hashing.
///
/// Implementations must never log or persist the plaintext, and
/// verification must be safe against timing comparison.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    async fn hash(&self, password: &str) -> Result<PasswordHash, Error>;

    /// Check a plaintext password against a stored hash.
    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, Error>;
}
