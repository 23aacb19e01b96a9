//! Session helpers keeping handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers deal in domain-friendly
//! operations: the signed-in actor, flash messages, and the CSRF
//! token. The cookie itself is signed by the session middleware; this
//! layer never trusts unparseable contents.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use chrono::Utc;
use futures_util::future::LocalBoxFuture;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Role, UserId};

use super::flash::Flash;

pub(crate) const ACTOR_KEY: &str = "actor";
pub(crate) const DEADLINE_KEY: &str = "expires_at";
pub(crate) const CSRF_KEY: &str = "_csrf";
pub(crate) const FLASH_KEY: &str = "_flashes";

/// Sessions without "remember me" expire this many hours after login.
const SESSION_TTL_HOURS: i64 = 12;

const CSRF_TOKEN_LEN: usize = 32;

/// The authenticated identity attached to the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        self.0
            .get::<T>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    fn write<T: Serialize>(&self, key: &str, value: T) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Establish an authenticated session for `actor`.
    ///
    /// Without `remember`, an absolute deadline is stored and checked
    /// on every read; with it, the cookie's own TTL is the only bound.
    pub fn sign_in(&self, actor: Actor, remember: bool) -> Result<(), Error> {
        // Fresh session state on privilege change.
        self.0.renew();
        self.write(ACTOR_KEY, actor)?;
        if remember {
            self.0.remove(DEADLINE_KEY);
            Ok(())
        } else {
            let deadline = Utc::now() + chrono::Duration::hours(SESSION_TTL_HOURS);
            self.write(DEADLINE_KEY, deadline.timestamp())
        }
    }

    /// Drop all session state, transitioning back to anonymous.
    ///
    /// Clears and rotates rather than purging so a goodbye flash can
    /// still be queued on the fresh session.
    pub fn sign_out(&self) {
        self.0.clear();
        self.0.renew();
    }

    /// The signed-in actor, or `None` when anonymous or expired.
    pub fn actor(&self) -> Result<Option<Actor>, Error> {
        if let Some(deadline) = self.read::<i64>(DEADLINE_KEY)?
            && Utc::now().timestamp() > deadline
        {
            self.0.purge();
            return Ok(None);
        }
        match self.0.get::<Actor>(ACTOR_KEY) {
            Ok(actor) => Ok(actor),
            Err(error) => {
                // A stale or tampered cookie payload is anonymous, not
                // a server error.
                tracing::warn!(%error, "unreadable actor in session cookie");
                self.0.purge();
                Ok(None)
            }
        }
    }

    /// The per-session anti-forgery token, generating one on first use.
    ///
    /// Embed the returned value in every form that mutates state.
    pub fn csrf_token(&self) -> Result<String, Error> {
        if let Some(token) = self.read::<String>(CSRF_KEY)? {
            return Ok(token);
        }
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(CSRF_TOKEN_LEN)
            .map(char::from)
            .collect();
        self.write(CSRF_KEY, &token)?;
        Ok(token)
    }

    /// Check a submitted token against the session token.
    ///
    /// Handlers call this before any other logic on a POST.
    pub fn verify_csrf(&self, submitted: &str) -> Result<(), Error> {
        let expected = self.read::<String>(CSRF_KEY)?;
        match expected {
            Some(expected) if !submitted.is_empty() && tokens_match(&expected, submitted) => Ok(()),
            _ => Err(Error::forbidden("invalid or missing CSRF token")),
        }
    }

    /// Queue a flash message for the next rendered page.
    pub fn flash(&self, flash: Flash) -> Result<(), Error> {
        let mut queued: Vec<Flash> = self.read(FLASH_KEY)?.unwrap_or_default();
        queued.push(flash);
        self.write(FLASH_KEY, queued)
    }

    /// Drain queued flash messages for rendering.
    pub fn take_flashes(&self) -> Vec<Flash> {
        match self.0.remove_as::<Vec<Flash>>(FLASH_KEY) {
            Some(Ok(flashes)) => flashes,
            Some(Err(_)) | None => Vec::new(),
        }
    }
}

/// Compare tokens without an early exit on the first differing byte.
fn tokens_match(expected: &str, submitted: &str) -> bool {
    let expected = expected.as_bytes();
    let submitted = submitted.as_bytes();
    if expected.len() != submitted.len() {
        return false;
    }
    expected
        .iter()
        .zip(submitted)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
