//! HTTP adapter: routes, session handling, and page rendering.

use actix_web::http::header;
use actix_web::{HttpResponse, web};

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod extract;
pub mod flash;
pub mod home;
pub mod jobs;
pub mod session;
pub mod state;
pub mod views;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::ApiResult;
pub use state::HttpState;

use crate::domain::Error;
use session::SessionContext;
use views::PageContext;

/// Register every route on the application.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home::index)
        .service(home::home_page)
        .service(auth::register_form)
        .service(auth::register_submit)
        .service(auth::login_form)
        .service(auth::login_submit)
        .service(auth::logout)
        .service(jobs::list)
        .service(jobs::new_form)
        .service(jobs::create)
        .service(jobs::detail)
        .service(jobs::apply_form)
        .service(jobs::apply_submit)
        .service(jobs::edit_form)
        .service(jobs::edit_submit)
        .service(jobs::delete)
        .service(dashboard::index)
        .service(dashboard::admin)
        .service(dashboard::employer)
        .service(dashboard::jobseeker)
        .service(dashboard::applications);
}

/// 303 redirect, the post-action response for every mutation.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_owned()))
        .finish()
}

/// 200 response carrying a rendered page.
pub(crate) fn html_page(markup: String) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
        .body(markup)
}

/// Build the rendering context for this request, draining flashes.
pub(crate) fn page_context(session: &SessionContext) -> Result<PageContext, Error> {
    Ok(PageContext {
        actor: session.actor()?,
        flashes: session.take_flashes(),
    })
}
