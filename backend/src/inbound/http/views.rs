//! Server-rendered HTML pages.
//!
//! Deliberately thin: plain functions assembling escaped HTML strings
//! from entity data. Handlers pass a [`PageContext`] carrying drained
//! flash messages and the sign-in state; nothing outside this module
//! inspects the markup.

use actix_web::http::StatusCode;
use pagination::Page;

use crate::domain::forms::{ApplyForm, FieldErrors, JobForm, LoginForm, RegisterForm};
use crate::domain::{Application, Job, Role, User};

use super::flash::Flash;
use super::session::Actor;

/// Per-request rendering context shared by every page.
#[derive(Debug, Default)]
pub struct PageContext {
    pub actor: Option<Actor>,
    pub flashes: Vec<Flash>,
}

/// Escape text for safe interpolation into HTML.
#[must_use]
pub fn esc(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn nav(ctx: &PageContext) -> String {
    let mut links = String::from(r#"<a href="/">Home</a> <a href="/jobs">Jobs</a>"#);
    if ctx.actor.is_some() {
        links.push_str(r#" <a href="/dashboard">Dashboard</a> <a href="/logout">Log out</a>"#);
    } else {
        links.push_str(r#" <a href="/login">Log in</a> <a href="/register">Register</a>"#);
    }
    format!("<nav>{links}</nav>")
}

fn flashes(ctx: &PageContext) -> String {
    let mut out = String::new();
    for flash in &ctx.flashes {
        out.push_str(&format!(
            r#"<p class="flash flash-{}">{}</p>"#,
            flash.level.as_str(),
            esc(&flash.message)
        ));
    }
    out
}

fn layout(ctx: &PageContext, title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{title} - Job Board</title></head><body>{nav}{flashes}\
         <main>{body}</main></body></html>",
        title = esc(title),
        nav = nav(ctx),
        flashes = flashes(ctx),
    )
}

fn field_error(errors: &FieldErrors, field: &str) -> String {
    errors
        .get(field)
        .map(|message| format!(r#"<span class="error">{}</span>"#, esc(message)))
        .unwrap_or_default()
}

fn csrf_input(token: &str) -> String {
    format!(
        r#"<input type="hidden" name="csrf_token" value="{}">"#,
        esc(token)
    )
}

fn job_summary(job: &Job) -> String {
    format!(
        r#"<li><a href="/job/{id}">{title}</a> at {company} ({location}), posted {posted}</li>"#,
        id = job.id,
        title = esc(&job.title),
        company = esc(&job.company),
        location = esc(&job.location),
        posted = job.posted_at.format("%Y-%m-%d"),
    )
}

/// Home page with the newest postings.
#[must_use]
pub fn home(ctx: &PageContext, latest: &[Job]) -> String {
    let mut body = String::from("<h1>Latest jobs</h1>");
    if latest.is_empty() {
        body.push_str("<p>No jobs have been posted yet.</p>");
    } else {
        body.push_str("<ul>");
        for job in latest {
            body.push_str(&job_summary(job));
        }
        body.push_str("</ul>");
    }
    layout(ctx, "Home", &body)
}

/// Paginated public job listing.
#[must_use]
pub fn job_list(ctx: &PageContext, page: &Page<Job>) -> String {
    let mut body = format!(
        "<h1>All jobs</h1><p>{total} job(s), page {page} of {pages}</p>",
        total = page.total(),
        page = page.page(),
        pages = page.total_pages(),
    );
    if page.items().is_empty() {
        body.push_str("<p>No jobs on this page.</p>");
    } else {
        body.push_str("<ul>");
        for job in page.items() {
            body.push_str(&job_summary(job));
        }
        body.push_str("</ul>");
    }
    body.push_str("<p>");
    if page.has_prev() {
        body.push_str(&format!(
            r#"<a href="/jobs?page={}">Previous</a> "#,
            page.page() - 1
        ));
    }
    if page.has_next() {
        body.push_str(&format!(
            r#"<a href="/jobs?page={}">Next</a>"#,
            page.page() + 1
        ));
    }
    body.push_str("</p>");
    layout(ctx, "Jobs", &body)
}

/// Public job detail page.
///
/// Action links adapt to the viewer: apply for jobseekers, edit and
/// delete for the author, delete for admins.
#[must_use]
pub fn job_detail(ctx: &PageContext, job: &Job, csrf: &str) -> String {
    let salary = job
        .salary
        .as_deref()
        .map_or_else(|| "Not specified".to_owned(), esc);
    let mut body = format!(
        "<h1>{title}</h1>\
         <p><strong>Company:</strong> {company}</p>\
         <p><strong>Location:</strong> {location}</p>\
         <p><strong>Salary:</strong> {salary}</p>\
         <p><strong>Posted:</strong> {posted}</p>\
         <div>{description}</div>",
        title = esc(&job.title),
        company = esc(&job.company),
        location = esc(&job.location),
        posted = job.posted_at.format("%Y-%m-%d"),
        description = esc(&job.description),
    );
    if let Some(actor) = ctx.actor {
        if actor.role == Role::Jobseeker {
            body.push_str(&format!(
                r#"<p><a href="/job/{}/apply">Apply for this job</a></p>"#,
                job.id
            ));
        }
        if actor.id == job.author {
            body.push_str(&format!(
                r#"<p><a href="/job/{}/edit">Edit</a></p>"#,
                job.id
            ));
        }
        if actor.id == job.author || actor.role == Role::Admin {
            body.push_str(&format!(
                r#"<form method="post" action="/job/{}/delete">{}<button type="submit">Delete</button></form>"#,
                job.id,
                csrf_input(csrf)
            ));
        }
    }
    layout(ctx, &job.title, &body)
}

/// Registration form, re-rendered with annotations on failure.
#[must_use]
pub fn register(
    ctx: &PageContext,
    form: &RegisterForm,
    errors: &FieldErrors,
    csrf: &str,
) -> String {
    let role_option = |value: &str, label: &str| {
        let selected = if form.role == value { " selected" } else { "" };
        format!(r#"<option value="{value}"{selected}>{label}</option>"#)
    };
    let body = format!(
        r#"<h1>Register</h1><form method="post" action="/register">{csrf}
<label>Username <input name="username" value="{username}"></label>{e_username}
<label>Email <input name="email" type="email" value="{email}"></label>{e_email}
<label>Role <select name="role">{opt_jobseeker}{opt_employer}</select></label>{e_role}
<label>Password <input name="password" type="password"></label>{e_password}
<label>Confirm password <input name="confirm_password" type="password"></label>{e_confirm}
<button type="submit">Sign up</button></form>"#,
        csrf = csrf_input(csrf),
        username = esc(&form.username),
        email = esc(&form.email),
        opt_jobseeker = role_option("jobseeker", "Jobseeker"),
        opt_employer = role_option("employer", "Employer"),
        e_username = field_error(errors, "username"),
        e_email = field_error(errors, "email"),
        e_role = field_error(errors, "role"),
        e_password = field_error(errors, "password"),
        e_confirm = field_error(errors, "confirm_password"),
    );
    layout(ctx, "Register", &body)
}

/// Login form. `next` survives failed attempts so the redirect target
/// is not lost.
#[must_use]
pub fn login(
    ctx: &PageContext,
    form: &LoginForm,
    errors: &FieldErrors,
    csrf: &str,
    next: Option<&str>,
) -> String {
    let action = match next {
        Some(next) => format!(
            "/login?{}",
            url::form_urlencoded::Serializer::new(String::new())
                .append_pair("next", next)
                .finish()
        ),
        None => "/login".to_owned(),
    };
    let body = format!(
        r#"<h1>Log in</h1><form method="post" action="{action}">{csrf}
<label>Email <input name="email" type="email" value="{email}"></label>{e_email}
<label>Password <input name="password" type="password"></label>{e_password}
<label><input name="remember" type="checkbox" value="on"> Remember me</label>
<button type="submit">Log in</button></form>"#,
        action = esc(&action),
        csrf = csrf_input(csrf),
        email = esc(&form.email),
        e_email = field_error(errors, "email"),
        e_password = field_error(errors, "password"),
    );
    layout(ctx, "Log in", &body)
}

/// Job post/edit form. `heading` and `action` differ between the two.
#[must_use]
pub fn job_form(
    ctx: &PageContext,
    heading: &str,
    action: &str,
    form: &JobForm,
    errors: &FieldErrors,
    csrf: &str,
) -> String {
    let body = format!(
        r#"<h1>{heading}</h1><form method="post" action="{action}">{csrf}
<label>Title <input name="title" value="{title}"></label>{e_title}
<label>Company <input name="company" value="{company}"></label>{e_company}
<label>Location <input name="location" value="{location}"></label>{e_location}
<label>Salary <input name="salary" value="{salary}"></label>
<label>Description <textarea name="description">{description}</textarea></label>{e_description}
<button type="submit">Save</button></form>"#,
        heading = esc(heading),
        action = esc(action),
        csrf = csrf_input(csrf),
        title = esc(&form.title),
        company = esc(&form.company),
        location = esc(&form.location),
        salary = esc(&form.salary),
        description = esc(&form.description),
        e_title = field_error(errors, "title"),
        e_company = field_error(errors, "company"),
        e_location = field_error(errors, "location"),
        e_description = field_error(errors, "description"),
    );
    layout(ctx, heading, &body)
}

/// Application form for one job.
#[must_use]
pub fn apply(
    ctx: &PageContext,
    job: &Job,
    form: &ApplyForm,
    errors: &FieldErrors,
    csrf: &str,
) -> String {
    let body = format!(
        r#"<h1>Apply: {title}</h1><form method="post" action="/job/{id}/apply">{csrf}
<label>Cover letter <textarea name="cover_letter">{cover}</textarea></label>{e_cover}
<button type="submit">Submit application</button></form>"#,
        title = esc(&job.title),
        id = job.id,
        csrf = csrf_input(csrf),
        cover = esc(&form.cover_letter),
        e_cover = field_error(errors, "cover_letter"),
    );
    layout(ctx, "Apply", &body)
}

fn application_row(application: &Application, job: &Job) -> String {
    format!(
        r#"<li><a href="/job/{id}">{title}</a> at {company} - {status}, applied {applied}</li>"#,
        id = job.id,
        title = esc(&job.title),
        company = esc(&job.company),
        status = application.status,
        applied = application.applied_at.format("%Y-%m-%d"),
    )
}

/// Admin dashboard: everything in the system.
#[must_use]
pub fn admin_dashboard(
    ctx: &PageContext,
    users: &[User],
    jobs: &[Job],
    applications: &[Application],
) -> String {
    let mut body = String::from("<h1>Admin dashboard</h1><h2>Users</h2><ul>");
    for user in users {
        body.push_str(&format!(
            "<li>{} &lt;{}&gt; ({})</li>",
            esc(user.username.as_ref()),
            esc(user.email.as_ref()),
            user.role,
        ));
    }
    body.push_str("</ul><h2>Jobs</h2><ul>");
    for job in jobs {
        body.push_str(&job_summary(job));
    }
    body.push_str("</ul><h2>Applications</h2><ul>");
    for application in applications {
        body.push_str(&format!(
            "<li>Application {} for job {} by user {} - {}</li>",
            application.id, application.job, application.applicant, application.status,
        ));
    }
    body.push_str("</ul>");
    layout(ctx, "Admin dashboard", &body)
}

/// Employer dashboard: own postings and who applied to them.
#[must_use]
pub fn employer_dashboard(
    ctx: &PageContext,
    jobs: &[Job],
    applications: &[(Application, Job)],
) -> String {
    let mut body = String::from(
        r#"<h1>Employer dashboard</h1><p><a href="/job/new">Post a job</a></p><h2>Your postings</h2>"#,
    );
    if jobs.is_empty() {
        body.push_str("<p>You have not posted any jobs yet.</p>");
    } else {
        body.push_str("<ul>");
        for job in jobs {
            body.push_str(&job_summary(job));
        }
        body.push_str("</ul>");
    }
    body.push_str("<h2>Applications received</h2>");
    if applications.is_empty() {
        body.push_str("<p>No applications yet.</p>");
    } else {
        body.push_str("<ul>");
        for (application, job) in applications {
            body.push_str(&application_row(application, job));
        }
        body.push_str("</ul>");
    }
    layout(ctx, "Employer dashboard", &body)
}

/// Jobseeker dashboard: own applications.
#[must_use]
pub fn jobseeker_dashboard(ctx: &PageContext, applications: &[(Application, Job)]) -> String {
    let mut body = String::from("<h1>Jobseeker dashboard</h1><h2>Your applications</h2>");
    if applications.is_empty() {
        body.push_str(r#"<p>You have not applied to any jobs. <a href="/jobs">Browse jobs</a></p>"#);
    } else {
        body.push_str("<ul>");
        for (application, job) in applications {
            body.push_str(&application_row(application, job));
        }
        body.push_str("</ul>");
    }
    layout(ctx, "Jobseeker dashboard", &body)
}

/// Plain listing of the actor's applications, any role.
#[must_use]
pub fn my_applications(ctx: &PageContext, applications: &[(Application, Job)]) -> String {
    let mut body = String::from("<h1>My applications</h1>");
    if applications.is_empty() {
        body.push_str("<p>No applications.</p>");
    } else {
        body.push_str("<ul>");
        for (application, job) in applications {
            body.push_str(&application_row(application, job));
        }
        body.push_str("</ul>");
    }
    layout(ctx, "My applications", &body)
}

/// Minimal standalone error page. Rendered without session access, so
/// it carries no nav state or flashes.
#[must_use]
pub fn error_page(status: StatusCode, message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{code} - Job Board</title></head><body><main>\
         <h1>{code} {reason}</h1><p>{message}</p>\
         <p><a href=\"/\">Back to the home page</a></p>\
         </main></body></html>",
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or(""),
        message = esc(message),
    )
}
