//! Bcrypt-backed credential store adapter.
//!
//! Bcrypt embeds its own salt in the encoded hash and compares in a
//! timing-safe manner. Hashing is CPU-bound, so both operations run on
//! the blocking thread pool rather than the async runtime.

use async_trait::async_trait;

use crate::domain::ports::PasswordHasher;
use crate::domain::{Error, PasswordHash};

/// Bcrypt cost used in production. Lower it in tests for speed.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// [`PasswordHasher`] implementation using bcrypt.
#[derive(Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl BcryptHasher {
    /// Hasher with the production cost factor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with an explicit cost factor. Tests use the bcrypt
    /// minimum (4) to stay fast.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

#[async_trait]
impl PasswordHasher for BcryptHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, Error> {
        let password = password.to_owned();
        let cost = self.cost;
        let encoded = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|err| Error::internal(format!("hashing task failed: {err}")))?
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;
        Ok(PasswordHash::new(encoded))
    }

    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, Error> {
        let password = password.to_owned();
        let encoded = hash.expose().to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &encoded))
            .await
            .map_err(|err| Error::internal(format!("verification task failed: {err}")))?
            .map_err(|err| Error::internal(format!("password verification failed: {err}")))
    }
}
