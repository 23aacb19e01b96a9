//! Home page: the newest postings at a glance.

use actix_web::{HttpResponse, get, web};

use super::session::SessionContext;
use super::{ApiResult, HttpState, html_page, page_context, views};

/// Number of postings shown on the home page.
const LATEST_COUNT: i64 = 5;

async fn render(state: &HttpState, session: &SessionContext) -> ApiResult<HttpResponse> {
    let ctx = page_context(session)?;
    let latest = state.jobs.latest(LATEST_COUNT).await?;
    Ok(html_page(views::home(&ctx, &latest)))
}

#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    render(&state, &session).await
}

#[get("/home")]
pub async fn home_page(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    render(&state, &session).await
}
