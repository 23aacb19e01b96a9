//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::{SessionMiddleware, config::PersistentSession};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use crate::inbound::http::{self, HttpState};
use crate::middleware::RequestLog;
use crate::outbound::BcryptHasher;
use crate::outbound::persistence::{
    DieselApplicationRepository, DieselJobRepository, DieselUserRepository,
};

/// Ceiling for "remember me" sessions. Sessions signed in without the
/// flag carry their own shorter deadline inside the cookie.
const REMEMBER_TTL_DAYS: i64 = 30;

/// Cookie session middleware with the application's cookie policy.
///
/// Shared between the real server and the test harness so both run the
/// same session semantics.
#[must_use]
pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    session_middleware_with(key, cookie_secure, SameSite::Lax)
}

fn session_middleware_with(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::days(REMEMBER_TTL_DAYS)),
        )
        .build()
}

/// Build the port implementations the handlers run against.
fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => HttpState::new(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselJobRepository::new(pool.clone())),
            Arc::new(DieselApplicationRepository::new(pool.clone())),
            Arc::new(BcryptHasher::new()),
        ),
        None => {
            tracing::warn!("no database pool configured; using the in-memory store");
            HttpState::in_memory()
        }
    }
}

fn build_app(
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(http_state)
        .wrap(session_middleware_with(key, cookie_secure, same_site))
        .wrap(RequestLog)
        .configure(http::routes)
}

/// Construct the HTTP server from a prepared [`ServerConfig`].
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<(Server, HttpState)> {
    let http_state = build_http_state(&config);
    let state_data = web::Data::new(http_state.clone());
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(state_data.clone(), key.clone(), cookie_secure, same_site)
    })
    .bind(bind_addr)?
    .run();

    Ok((server, http_state))
}
