//! Request extractors enforcing authentication.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload};
use futures_util::future::LocalBoxFuture;

use super::session::{Actor, SessionContext};

/// Rejection raised when a guarded route is hit anonymously.
///
/// Renders as a redirect to the login page carrying the original path
/// so a successful login can resume where the visitor left off.
#[derive(Debug, thiserror::Error)]
#[error("authentication required")]
pub struct LoginRequired {
    next: String,
}

impl LoginRequired {
    fn for_path(path: &str) -> Self {
        Self {
            next: path.to_owned(),
        }
    }

    /// Target of the redirect, with the original path URL-encoded.
    #[must_use]
    pub fn location(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("next", &self.next)
            .finish();
        format!("/login?{query}")
    }
}

impl ResponseError for LoginRequired {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, self.location()))
            .finish()
    }
}

/// The signed-in actor, required.
///
/// Extraction fails with a redirect to `/login` when the session is
/// anonymous or expired. Handlers that merely adapt to sign-in state
/// use [`SessionContext::actor`] directly instead.
#[derive(Debug, Clone, Copy)]
pub struct CurrentActor(pub Actor);

impl FromRequest for CurrentActor {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let path = req.path().to_owned();
        let session = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let session = session.await?;
            match session.actor()? {
                Some(actor) => Ok(Self(actor)),
                None => Err(LoginRequired::for_path(&path).into()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error, Role, UserId};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    #[core::prelude::v1::test]
    fn login_redirect_encodes_the_original_path() {
        let rejection = LoginRequired::for_path("/job/3/edit");
        assert_eq!(rejection.location(), "/login?next=%2Fjob%2F3%2Fedit");
    }

    #[actix_web::test]
    async fn anonymous_request_is_redirected_to_login() {
        let app = test::init_service(
            App::new()
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .route(
                    "/dashboard",
                    web::get().to(|_actor: CurrentActor| async { HttpResponse::Ok() }),
                ),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/dashboard").to_request())
                .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .expect("location header");
        assert_eq!(location, "/login?next=%2Fdashboard");
    }

    #[actix_web::test]
    async fn expired_session_is_redirected_to_login() {
        use super::super::session::DEADLINE_KEY;

        let app = test::init_service(
            App::new()
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .route(
                    "/in-stale",
                    web::get().to(
                        |session: SessionContext, raw: actix_session::Session| async move {
                            session.sign_in(
                                Actor {
                                    id: UserId(1),
                                    role: Role::Jobseeker,
                                },
                                false,
                            )?;
                            let past = chrono::Utc::now() - chrono::Duration::hours(1);
                            raw.insert(DEADLINE_KEY, past.timestamp())
                                .map_err(|error| Error::internal(error.to_string()))?;
                            Ok::<_, Error>(HttpResponse::Ok())
                        },
                    ),
                )
                .route(
                    "/dashboard",
                    web::get().to(|_actor: CurrentActor| async { HttpResponse::Ok() }),
                ),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/in-stale").to_request()).await;
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/dashboard")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/login?next=%2Fdashboard")
        );
    }

    #[actix_web::test]
    async fn signed_in_request_passes_through() {
        let app = test::init_service(
            App::new()
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .route(
                    "/in",
                    web::get().to(|session: SessionContext| async move {
                        session.sign_in(
                            Actor {
                                id: UserId(1),
                                role: Role::Jobseeker,
                            },
                            false,
                        )?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/dashboard",
                    web::get().to(|actor: CurrentActor| async move {
                        HttpResponse::Ok().body(actor.0.role.as_str())
                    }),
                ),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/in").to_request()).await;
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/dashboard")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "jobseeker");
    }
}
