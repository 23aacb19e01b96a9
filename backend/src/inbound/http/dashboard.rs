//! Role-specific dashboards.
//!
//! `/dashboard` routes by role; each role page soft-gates visitors of
//! the wrong role with a flash and a redirect home.

use actix_web::{HttpResponse, get, web};

use crate::domain::Role;

use super::extract::CurrentActor;
use super::flash::Flash;
use super::session::SessionContext;
use super::{ApiResult, HttpState, html_page, page_context, see_other, views};

fn require_role(
    session: &SessionContext,
    actual: Role,
    expected: Role,
) -> ApiResult<Option<HttpResponse>> {
    if actual == expected {
        return Ok(None);
    }
    session.flash(Flash::danger("That dashboard is not available to your account."))?;
    Ok(Some(see_other("/")))
}

#[get("/dashboard")]
pub async fn index(actor: CurrentActor) -> ApiResult<HttpResponse> {
    let target = match actor.0.role {
        Role::Admin => "/dashboard/admin",
        Role::Employer => "/dashboard/employer",
        Role::Jobseeker => "/dashboard/jobseeker",
    };
    Ok(see_other(target))
}

#[get("/dashboard/admin")]
pub async fn admin(
    state: web::Data<HttpState>,
    session: SessionContext,
    actor: CurrentActor,
) -> ApiResult<HttpResponse> {
    if let Some(bounce) = require_role(&session, actor.0.role, Role::Admin)? {
        return Ok(bounce);
    }
    let users = state.users.list_all().await?;
    let jobs = state.jobs.list_all().await?;
    let received = state.applications.list_all().await?;
    let ctx = page_context(&session)?;
    Ok(html_page(views::admin_dashboard(
        &ctx,
        &users,
        &jobs,
        &received,
    )))
}

#[get("/dashboard/employer")]
pub async fn employer(
    state: web::Data<HttpState>,
    session: SessionContext,
    actor: CurrentActor,
) -> ApiResult<HttpResponse> {
    if let Some(bounce) = require_role(&session, actor.0.role, Role::Employer)? {
        return Ok(bounce);
    }
    let jobs = state.jobs.list_by_author(actor.0.id).await?;
    let received = state.applications.list_for_employer(actor.0.id).await?;
    let ctx = page_context(&session)?;
    Ok(html_page(views::employer_dashboard(&ctx, &jobs, &received)))
}

#[get("/dashboard/jobseeker")]
pub async fn jobseeker(
    state: web::Data<HttpState>,
    session: SessionContext,
    actor: CurrentActor,
) -> ApiResult<HttpResponse> {
    if let Some(bounce) = require_role(&session, actor.0.role, Role::Jobseeker)? {
        return Ok(bounce);
    }
    let submitted = state.applications.list_by_applicant(actor.0.id).await?;
    let ctx = page_context(&session)?;
    Ok(html_page(views::jobseeker_dashboard(&ctx, &submitted)))
}

/// Unlike the role dashboards this page has no role gate: any signed-in
/// account may list its own applications.
#[get("/dashboard/applications")]
pub async fn applications(
    state: web::Data<HttpState>,
    session: SessionContext,
    actor: CurrentActor,
) -> ApiResult<HttpResponse> {
    let submitted = state.applications.list_by_applicant(actor.0.id).await?;
    let ctx = page_context(&session)?;
    Ok(html_page(views::my_applications(&ctx, &submitted)))
}
