//! Job listing, detail, posting, applying, editing, and deletion.
//!
//! Authorisation is deliberately uneven, mirroring how the flows are
//! reached: role mismatches on post/apply flash and redirect (the
//! visitor followed an honest link), while ownership failures on
//! edit/delete are hard 403s (the request was forged or guessed).

use actix_web::{HttpResponse, get, post, web};
use pagination::PageRequest;
use serde::Deserialize;

use crate::domain::forms::{
    ApplyForm, FieldErrors, JobForm, validate_application, validate_job,
};
use crate::domain::ports::StoreError;
use crate::domain::{Error, Job, JobChanges, JobId, NewApplication, NewJob, Role};

use super::extract::CurrentActor;
use super::flash::Flash;
use super::session::{Actor, SessionContext};
use super::{ApiResult, HttpState, html_page, page_context, see_other, views};

/// Fixed number of postings per listing page.
const PAGE_SIZE: u32 = 5;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    page: Option<u32>,
}

async fn load_job(state: &HttpState, id: JobId) -> ApiResult<Job> {
    state
        .jobs
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("no such job"))
}

fn prefill(job: &Job) -> JobForm {
    JobForm {
        title: job.title.clone(),
        company: job.company.clone(),
        location: job.location.clone(),
        salary: job.salary.clone().unwrap_or_default(),
        description: job.description.clone(),
        csrf_token: String::new(),
    }
}

/// Soft gate: non-employers are flashed and sent home.
fn require_employer(session: &SessionContext, actor: Actor) -> ApiResult<Option<HttpResponse>> {
    if actor.role == Role::Employer {
        return Ok(None);
    }
    session.flash(Flash::danger("Only employers can post jobs."))?;
    Ok(Some(see_other("/")))
}

/// Soft gate: non-jobseekers are flashed and sent back to the job.
fn require_jobseeker(
    session: &SessionContext,
    actor: Actor,
    job: JobId,
) -> ApiResult<Option<HttpResponse>> {
    if actor.role == Role::Jobseeker {
        return Ok(None);
    }
    session.flash(Flash::danger("Only jobseekers can apply for jobs."))?;
    Ok(Some(see_other(&format!("/job/{job}"))))
}

#[get("/jobs")]
pub async fn list(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let request = PageRequest::new(query.page.unwrap_or(1), PAGE_SIZE)
        .map_err(|err| Error::internal(err.to_string()))?;
    let page = state.jobs.list_page(request).await?;
    let ctx = page_context(&session)?;
    Ok(html_page(views::job_list(&ctx, &page)))
}

#[get("/job/new")]
pub async fn new_form(session: SessionContext, actor: CurrentActor) -> ApiResult<HttpResponse> {
    if let Some(bounce) = require_employer(&session, actor.0)? {
        return Ok(bounce);
    }
    let csrf = session.csrf_token()?;
    let ctx = page_context(&session)?;
    Ok(html_page(views::job_form(
        &ctx,
        "Post a job",
        "/job/new",
        &JobForm::default(),
        &FieldErrors::default(),
        &csrf,
    )))
}

#[post("/job/new")]
pub async fn create(
    state: web::Data<HttpState>,
    session: SessionContext,
    actor: CurrentActor,
    form: web::Form<JobForm>,
) -> ApiResult<HttpResponse> {
    session.verify_csrf(&form.csrf_token)?;
    if let Some(bounce) = require_employer(&session, actor.0)? {
        return Ok(bounce);
    }

    let valid = match validate_job(&form) {
        Ok(valid) => valid,
        Err(errors) => {
            let csrf = session.csrf_token()?;
            let ctx = page_context(&session)?;
            return Ok(html_page(views::job_form(
                &ctx,
                "Post a job",
                "/job/new",
                &form,
                &errors,
                &csrf,
            )));
        }
    };

    let job = state
        .jobs
        .create(NewJob {
            title: valid.title,
            description: valid.description,
            location: valid.location,
            company: valid.company,
            salary: valid.salary,
            author: actor.0.id,
        })
        .await?;
    tracing::info!(job_id = %job.id, author = %job.author, "job posted");
    session.flash(Flash::success("Job posted successfully!"))?;
    Ok(see_other(&format!("/job/{}", job.id)))
}

#[get("/job/{id}")]
pub async fn detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let job = load_job(&state, JobId(path.into_inner())).await?;
    let csrf = session.csrf_token()?;
    let ctx = page_context(&session)?;
    Ok(html_page(views::job_detail(&ctx, &job, &csrf)))
}

#[get("/job/{id}/apply")]
pub async fn apply_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    actor: CurrentActor,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let job = load_job(&state, JobId(path.into_inner())).await?;
    if let Some(bounce) = require_jobseeker(&session, actor.0, job.id)? {
        return Ok(bounce);
    }
    if state.applications.exists(actor.0.id, job.id).await? {
        session.flash(Flash::warning("You have already applied to this job."))?;
        return Ok(see_other(&format!("/job/{}", job.id)));
    }
    let csrf = session.csrf_token()?;
    let ctx = page_context(&session)?;
    Ok(html_page(views::apply(
        &ctx,
        &job,
        &ApplyForm::default(),
        &FieldErrors::default(),
        &csrf,
    )))
}

#[post("/job/{id}/apply")]
pub async fn apply_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    actor: CurrentActor,
    path: web::Path<i32>,
    form: web::Form<ApplyForm>,
) -> ApiResult<HttpResponse> {
    session.verify_csrf(&form.csrf_token)?;
    let job = load_job(&state, JobId(path.into_inner())).await?;
    if let Some(bounce) = require_jobseeker(&session, actor.0, job.id)? {
        return Ok(bounce);
    }
    if state.applications.exists(actor.0.id, job.id).await? {
        session.flash(Flash::warning("You have already applied to this job."))?;
        return Ok(see_other(&format!("/job/{}", job.id)));
    }

    let cover_letter = match validate_application(&form) {
        Ok(cover_letter) => cover_letter,
        Err(errors) => {
            let csrf = session.csrf_token()?;
            let ctx = page_context(&session)?;
            return Ok(html_page(views::apply(&ctx, &job, &form, &errors, &csrf)));
        }
    };

    match state
        .applications
        .create(NewApplication {
            cover_letter,
            job: job.id,
            applicant: actor.0.id,
        })
        .await
    {
        Ok(application) => {
            tracing::info!(
                application_id = %application.id,
                job_id = %job.id,
                applicant = %actor.0.id,
                "application submitted"
            );
            session.flash(Flash::success("Application submitted!"))?;
        }
        // Pre-check raced a concurrent submission; treat as duplicate.
        Err(StoreError::Conflict { .. }) => {
            session.flash(Flash::warning("You have already applied to this job."))?;
        }
        Err(err) => return Err(err.into()),
    }
    Ok(see_other(&format!("/job/{}", job.id)))
}

#[get("/job/{id}/edit")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    actor: CurrentActor,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let job = load_job(&state, JobId(path.into_inner())).await?;
    if actor.0.id != job.author {
        return Err(Error::forbidden("only the author can edit this job"));
    }
    let csrf = session.csrf_token()?;
    let ctx = page_context(&session)?;
    Ok(html_page(views::job_form(
        &ctx,
        "Edit job",
        &format!("/job/{}/edit", job.id),
        &prefill(&job),
        &FieldErrors::default(),
        &csrf,
    )))
}

#[post("/job/{id}/edit")]
pub async fn edit_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    actor: CurrentActor,
    path: web::Path<i32>,
    form: web::Form<JobForm>,
) -> ApiResult<HttpResponse> {
    session.verify_csrf(&form.csrf_token)?;
    let job = load_job(&state, JobId(path.into_inner())).await?;
    if actor.0.id != job.author {
        return Err(Error::forbidden("only the author can edit this job"));
    }

    let valid = match validate_job(&form) {
        Ok(valid) => valid,
        Err(errors) => {
            let csrf = session.csrf_token()?;
            let ctx = page_context(&session)?;
            return Ok(html_page(views::job_form(
                &ctx,
                "Edit job",
                &format!("/job/{}/edit", job.id),
                &form,
                &errors,
                &csrf,
            )));
        }
    };

    let updated = state
        .jobs
        .update(
            job.id,
            JobChanges {
                title: valid.title,
                description: valid.description,
                location: valid.location,
                company: valid.company,
                salary: valid.salary,
            },
        )
        .await?;
    tracing::info!(job_id = %updated.id, "job updated");
    session.flash(Flash::success("Job updated."))?;
    Ok(see_other(&format!("/job/{}", updated.id)))
}

#[post("/job/{id}/delete")]
pub async fn delete(
    state: web::Data<HttpState>,
    session: SessionContext,
    actor: CurrentActor,
    form: web::Form<DeleteForm>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    session.verify_csrf(&form.csrf_token)?;
    let job = load_job(&state, JobId(path.into_inner())).await?;
    if actor.0.id != job.author && actor.0.role != Role::Admin {
        return Err(Error::forbidden("only the author or an admin can delete this job"));
    }

    match state.jobs.delete(job.id).await {
        Ok(()) => {
            tracing::info!(job_id = %job.id, deleted_by = %actor.0.id, "job deleted");
            session.flash(Flash::success("Job deleted."))?;
            Ok(see_other("/jobs"))
        }
        Err(StoreError::NotFound) => Err(Error::not_found("no such job")),
        Err(err) => {
            // Nothing was removed; the transaction rolled back.
            session.flash(Flash::danger("Failed to delete the job. Please try again."))?;
            Err(err.into())
        }
    }
}

/// Delete has no fields beyond the anti-forgery token.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub csrf_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};

    type TestService = actix_web::dev::ServiceResponse;

    async fn app_with_state(
        state: HttpState,
    ) -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = TestService,
        Error = actix_web::Error,
    > {
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(test_utils::test_session_middleware())
                .configure(test_utils::test_routes),
        )
        .await
    }

    async fn sign_in(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = TestService,
            Error = actix_web::Error,
        >,
        id: i32,
        role: &str,
    ) -> (actix_web::cookie::Cookie<'static>, String) {
        let res = test::call_service(
            app,
            test::TestRequest::get()
                .uri(&format!("/test/sign-in?id={id}&role={role}"))
                .to_request(),
        )
        .await;
        let cookie = test_utils::session_cookie(&res);
        let token = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8");
        (cookie, token)
    }

    fn job_body(token: &str, title: &str) -> Vec<(String, String)> {
        vec![
            ("title".to_owned(), title.to_owned()),
            ("company".to_owned(), "Initech".to_owned()),
            ("location".to_owned(), "Remote".to_owned()),
            ("salary".to_owned(), String::new()),
            ("description".to_owned(), "Ship things".to_owned()),
            ("csrf_token".to_owned(), token.to_owned()),
        ]
    }

    async fn seed_job(state: &HttpState, author: i32, title: &str) -> JobId {
        state
            .jobs
            .create(NewJob {
                title: title.to_owned(),
                description: "desc".to_owned(),
                location: "Remote".to_owned(),
                company: "Initech".to_owned(),
                salary: None,
                author: crate::domain::UserId(author),
            })
            .await
            .expect("create job")
            .id
    }

    #[actix_web::test]
    async fn employer_posts_a_job_and_is_redirected_to_it() {
        let state = HttpState::in_memory();
        let app = app_with_state(state).await;
        let (cookie, token) = sign_in(&app, 1, "employer").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/job/new")
                .cookie(cookie)
                .set_form(job_body(&token, "Backend Engineer"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let location = res.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        assert!(location.starts_with("/job/"));
    }

    #[actix_web::test]
    async fn jobseeker_posting_a_job_is_flashed_home() {
        let state = HttpState::in_memory();
        let app = app_with_state(state).await;
        let (cookie, token) = sign_in(&app, 1, "jobseeker").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/job/new")
                .cookie(cookie)
                .set_form(job_body(&token, "Backend Engineer"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[actix_web::test]
    async fn unknown_job_detail_is_404() {
        let app = app_with_state(HttpState::in_memory()).await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/job/999").to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn out_of_range_page_renders_empty_not_an_error() {
        let state = HttpState::in_memory();
        seed_job(&state, 1, "Only job").await;
        let app = app_with_state(state).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/jobs?page=40").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let html = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8");
        assert!(html.contains("No jobs on this page"));
    }

    #[actix_web::test]
    async fn non_author_edit_is_a_hard_403() {
        let state = HttpState::in_memory();
        let job = seed_job(&state, 1, "Backend Engineer").await;
        let app = app_with_state(state).await;
        let (cookie, token) = sign_in(&app, 2, "employer").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/job/{job}/edit"))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/job/{job}/edit"))
                .cookie(cookie)
                .set_form(job_body(&token, "Hijacked"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn author_edit_updates_the_posting() {
        let state = HttpState::in_memory();
        let job = seed_job(&state, 1, "Backend Engineer").await;
        let app = app_with_state(state.clone()).await;
        let (cookie, token) = sign_in(&app, 1, "employer").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/job/{job}/edit"))
                .cookie(cookie)
                .set_form(job_body(&token, "Staff Engineer"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let updated = state.jobs.find_by_id(job).await.expect("query").expect("job");
        assert_eq!(updated.title, "Staff Engineer");
    }

    #[actix_web::test]
    async fn second_application_warns_and_redirects() {
        let state = HttpState::in_memory();
        let job = seed_job(&state, 1, "Backend Engineer").await;
        let app = app_with_state(state).await;
        let (cookie, token) = sign_in(&app, 2, "jobseeker").await;

        let body = vec![
            ("cover_letter".to_owned(), "Pick me".to_owned()),
            ("csrf_token".to_owned(), token.clone()),
        ];
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/job/{job}/apply"))
                .cookie(cookie.clone())
                .set_form(body.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let cookie = test_utils::session_cookie(&res);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/job/{job}/apply"))
                .cookie(cookie)
                .set_form(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let cookie = test_utils::session_cookie(&res);

        // The warning flash lands on the next rendered page.
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/job/{job}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let html = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8");
        assert!(html.contains("already applied"));
    }

    #[actix_web::test]
    async fn employer_applying_is_flashed_back_to_the_job() {
        let state = HttpState::in_memory();
        let job = seed_job(&state, 1, "Backend Engineer").await;
        let app = app_with_state(state).await;
        let (cookie, _token) = sign_in(&app, 3, "employer").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/job/{job}/apply"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
            format!("/job/{job}")
        );
    }

    #[actix_web::test]
    async fn delete_cascades_applications() {
        let state = HttpState::in_memory();
        let job = seed_job(&state, 1, "Backend Engineer").await;
        for applicant in 10..13 {
            state
                .applications
                .create(NewApplication {
                    cover_letter: "Pick me".to_owned(),
                    job,
                    applicant: crate::domain::UserId(applicant),
                })
                .await
                .expect("apply");
        }
        let app = app_with_state(state.clone()).await;
        let (cookie, token) = sign_in(&app, 1, "employer").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/job/{job}/delete"))
                .cookie(cookie)
                .set_form(vec![("csrf_token".to_owned(), token)])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/jobs");

        assert!(state.jobs.find_by_id(job).await.expect("query").is_none());
        let remaining = state.applications.list_all().await.expect("query");
        assert!(remaining.is_empty());
    }

    #[actix_web::test]
    async fn admin_may_delete_a_job_they_do_not_own() {
        let state = HttpState::in_memory();
        let job = seed_job(&state, 1, "Backend Engineer").await;
        let app = app_with_state(state.clone()).await;
        let (cookie, token) = sign_in(&app, 99, "admin").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/job/{job}/delete"))
                .cookie(cookie)
                .set_form(vec![("csrf_token".to_owned(), token)])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(state.jobs.find_by_id(job).await.expect("query").is_none());
    }

    #[actix_web::test]
    async fn unrelated_user_cannot_delete_a_job() {
        let state = HttpState::in_memory();
        let job = seed_job(&state, 1, "Backend Engineer").await;
        let app = app_with_state(state.clone()).await;
        let (cookie, token) = sign_in(&app, 2, "jobseeker").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/job/{job}/delete"))
                .cookie(cookie)
                .set_form(vec![("csrf_token".to_owned(), token)])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert!(state.jobs.find_by_id(job).await.expect("query").is_some());
    }

    #[actix_web::test]
    async fn anonymous_visitor_is_redirected_to_login_with_next() {
        let app = app_with_state(HttpState::in_memory()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/job/new").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "/login?next=%2Fjob%2Fnew"
        );
    }
}
