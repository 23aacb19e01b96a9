//! Job-board backend library modules.
//!
//! Hexagonal layout: `domain` holds entities, validation, and port
//! traits; `inbound` carries the HTTP adapter; `outbound` the Diesel
//! and bcrypt adapters; `server` assembles the application.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
