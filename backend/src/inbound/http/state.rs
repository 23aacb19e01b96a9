//! Shared application state handed to the HTTP handlers.

use std::sync::Arc;

use crate::domain::ports::{
    ApplicationRepository, JobRepository, PasswordHasher, UserRepository,
};

/// Port implementations shared across workers.
///
/// Handlers only see the trait objects, so the same routing tree runs
/// against Diesel-backed adapters in production and the in-memory
/// store in tests.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
}

impl HttpState {
    /// Assemble state from concrete adapters.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        jobs: Arc<dyn JobRepository>,
        applications: Arc<dyn ApplicationRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            users,
            jobs,
            applications,
            hasher,
        }
    }

    /// State backed entirely by the in-memory store, with a cheap
    /// bcrypt cost. Used by handler and integration tests.
    #[must_use]
    pub fn in_memory() -> Self {
        let store = Arc::new(crate::domain::ports::memory::MemoryStore::default());
        Self {
            users: store.clone(),
            jobs: store.clone(),
            applications: store,
            hasher: Arc::new(crate::outbound::BcryptHasher::with_cost(4)),
        }
    }
}
