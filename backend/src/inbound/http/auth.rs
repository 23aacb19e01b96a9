//! Registration, login, and logout.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::accounts::{self, RegisterOutcome};
use crate::domain::forms::{FieldErrors, LoginForm, RegisterForm, validate_login};

use super::flash::Flash;
use super::session::{Actor, SessionContext};
use super::{ApiResult, HttpState, html_page, page_context, see_other, views};

/// Optional post-login destination carried through the login flow.
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

impl NextQuery {
    /// The redirect target, if it is a local path.
    ///
    /// Anything that is not a same-origin absolute path (including
    /// scheme-relative `//host` forms) is discarded so login cannot be
    /// used as an open redirect.
    fn safe_next(&self) -> Option<&str> {
        self.next
            .as_deref()
            .filter(|next| next.starts_with('/') && !next.starts_with("//") && !next.contains('\\'))
    }
}

#[get("/register")]
pub async fn register_form(session: SessionContext) -> ApiResult<HttpResponse> {
    if session.actor()?.is_some() {
        return Ok(see_other("/"));
    }
    let csrf = session.csrf_token()?;
    let ctx = page_context(&session)?;
    Ok(html_page(views::register(
        &ctx,
        &RegisterForm::default(),
        &FieldErrors::default(),
        &csrf,
    )))
}

#[post("/register")]
pub async fn register_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<RegisterForm>,
) -> ApiResult<HttpResponse> {
    session.verify_csrf(&form.csrf_token)?;
    if session.actor()?.is_some() {
        return Ok(see_other("/"));
    }

    match accounts::register(&state.users, &state.hasher, &form).await? {
        RegisterOutcome::Created(_) => {
            session.flash(Flash::success("Registration successful! You can now log in."))?;
            Ok(see_other("/login"))
        }
        RegisterOutcome::Invalid(errors) => {
            let csrf = session.csrf_token()?;
            let ctx = page_context(&session)?;
            Ok(html_page(views::register(&ctx, &form, &errors, &csrf)))
        }
        RegisterOutcome::Conflict => {
            session.flash(Flash::danger(
                "That username or email was just taken. Please try again.",
            ))?;
            let csrf = session.csrf_token()?;
            let ctx = page_context(&session)?;
            Ok(html_page(views::register(
                &ctx,
                &form,
                &FieldErrors::default(),
                &csrf,
            )))
        }
    }
}

#[get("/login")]
pub async fn login_form(
    session: SessionContext,
    query: web::Query<NextQuery>,
) -> ApiResult<HttpResponse> {
    if session.actor()?.is_some() {
        return Ok(see_other("/"));
    }
    let csrf = session.csrf_token()?;
    let ctx = page_context(&session)?;
    Ok(html_page(views::login(
        &ctx,
        &LoginForm::default(),
        &FieldErrors::default(),
        &csrf,
        query.safe_next(),
    )))
}

#[post("/login")]
pub async fn login_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NextQuery>,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    session.verify_csrf(&form.csrf_token)?;
    if session.actor()?.is_some() {
        return Ok(see_other("/"));
    }

    let valid = match validate_login(&form) {
        Ok(valid) => valid,
        Err(errors) => {
            let csrf = session.csrf_token()?;
            let ctx = page_context(&session)?;
            return Ok(html_page(views::login(
                &ctx,
                &form,
                &errors,
                &csrf,
                query.safe_next(),
            )));
        }
    };

    match accounts::authenticate(&state.users, &state.hasher, &valid.email, &valid.password).await? {
        Some(user) => {
            session.sign_in(
                Actor {
                    id: user.id,
                    role: user.role,
                },
                valid.remember,
            )?;
            tracing::info!(user_id = %user.id, remember = valid.remember, "signed in");
            session.flash(Flash::success("Logged in successfully."))?;
            Ok(see_other(query.safe_next().unwrap_or("/dashboard")))
        }
        None => {
            session.flash(Flash::danger(
                "Login unsuccessful. Please check email and password.",
            ))?;
            let csrf = session.csrf_token()?;
            let ctx = page_context(&session)?;
            Ok(html_page(views::login(
                &ctx,
                &form,
                &FieldErrors::default(),
                &csrf,
                query.safe_next(),
            )))
        }
    }
}

#[get("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.sign_out();
    session.flash(Flash::info("You have been logged out."))?;
    Ok(see_other("/"))
}
