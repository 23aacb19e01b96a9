//! Shared fixtures for handler tests.

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::domain::{Error, Role, UserId};

use super::session::{Actor, SessionContext};

/// Cookie session middleware with an ephemeral key, matching the
/// production cookie settings apart from `Secure`.
pub(crate) fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    crate::server::session_middleware(Key::generate(), false)
}

#[derive(Deserialize)]
struct FakeLogin {
    id: i32,
    role: String,
}

async fn fake_sign_in(
    session: SessionContext,
    query: web::Query<FakeLogin>,
) -> Result<HttpResponse, Error> {
    let role = Role::parse(&query.role).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.sign_in(
        Actor {
            id: UserId(query.id),
            role,
        },
        false,
    )?;
    let token = session.csrf_token()?;
    Ok(HttpResponse::Ok().body(token))
}

async fn fake_csrf(session: SessionContext) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().body(session.csrf_token()?))
}

/// The full route tree plus test-only endpoints that mint a session
/// without walking the register/login flow.
///
/// `GET /test/sign-in?id=N&role=R` signs in and returns the CSRF
/// token as the body; `GET /test/csrf` returns the anonymous token.
pub(crate) fn test_routes(cfg: &mut web::ServiceConfig) {
    super::routes(cfg);
    cfg.route("/test/sign-in", web::get().to(fake_sign_in))
        .route("/test/csrf", web::get().to(fake_csrf));
}

/// Extract the session cookie from a response.
pub(crate) fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
