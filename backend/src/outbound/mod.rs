//! Outbound adapters: implementations of the domain ports.

mod bcrypt_hasher;
pub mod persistence;

pub use bcrypt_hasher::BcryptHasher;
