//! Typed form inputs and their pure validators.
//!
//! Each user-facing action has one input struct deserialised from the
//! submitted form body and one validator returning either normalised
//! domain values or a list of per-field errors. Validation is
//! all-or-nothing: any error means no mutation happens and the form is
//! re-rendered with the annotations.
//!
//! Cross-entity uniqueness checks (username/email taken) live in the
//! account service, not here, because they need the store.

use serde::Deserialize;

use crate::domain::{EmailAddress, Role, Username};

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Accumulated validation failures for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Record a failure against `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Whether the submission passed every check.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First message recorded for `field`, for form annotations.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// All recorded failures in submission order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

/// Raw registration submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub csrf_token: String,
}

/// Normalised registration values after field validation.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub username: Username,
    pub email: EmailAddress,
    pub role: Role,
    pub password: String,
}

/// Validate a registration submission field by field.
///
/// Uniqueness against existing accounts is checked separately by the
/// account service so this stays a pure function.
pub fn validate_registration(form: &RegisterForm) -> Result<ValidRegistration, FieldErrors> {
    let mut errors = FieldErrors::default();

    let username = match Username::new(&form.username) {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push("username", err.to_string());
            None
        }
    };
    let email = match EmailAddress::new(&form.email) {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push("email", err.to_string());
            None
        }
    };
    let role = match Role::parse_registerable(&form.role) {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push("role", err.to_string());
            None
        }
    };
    if form.password.is_empty() {
        errors.push("password", "password must not be empty");
    }
    if form.confirm_password != form.password {
        errors.push("confirm_password", "passwords do not match");
    }

    match (username, email, role, errors.is_empty()) {
        (Some(username), Some(email), Some(role), true) => Ok(ValidRegistration {
            username,
            email,
            role,
            password: form.password.clone(),
        }),
        _ => Err(errors),
    }
}

/// Raw login submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember: Option<String>,
    #[serde(default)]
    pub csrf_token: String,
}

impl LoginForm {
    /// Whether the "remember me" box was ticked.
    ///
    /// Browsers omit unchecked checkboxes, so presence means ticked.
    #[must_use]
    pub fn remember_me(&self) -> bool {
        self.remember.is_some()
    }
}

/// Normalised login values after field validation.
#[derive(Debug, Clone)]
pub struct ValidLogin {
    pub email: EmailAddress,
    pub password: String,
    pub remember: bool,
}

/// Validate a login submission.
pub fn validate_login(form: &LoginForm) -> Result<ValidLogin, FieldErrors> {
    let mut errors = FieldErrors::default();

    let email = match EmailAddress::new(&form.email) {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push("email", err.to_string());
            None
        }
    };
    if form.password.is_empty() {
        errors.push("password", "password must not be empty");
    }

    match (email, errors.is_empty()) {
        (Some(email), true) => Ok(ValidLogin {
            email,
            password: form.password.clone(),
            remember: form.remember_me(),
        }),
        _ => Err(errors),
    }
}

/// Raw job post/edit submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub csrf_token: String,
}

/// Normalised job fields after validation. Salary stays free text and
/// optional.
#[derive(Debug, Clone)]
pub struct ValidJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<String>,
    pub description: String,
}

/// Validate a job post or edit submission.
pub fn validate_job(form: &JobForm) -> Result<ValidJob, FieldErrors> {
    let mut errors = FieldErrors::default();

    let title = form.title.trim();
    let company = form.company.trim();
    let location = form.location.trim();
    let description = form.description.trim();

    if title.is_empty() {
        errors.push("title", "title must not be empty");
    }
    if company.is_empty() {
        errors.push("company", "company must not be empty");
    }
    if location.is_empty() {
        errors.push("location", "location must not be empty");
    }
    if description.is_empty() {
        errors.push("description", "description must not be empty");
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let salary = form.salary.trim();
    Ok(ValidJob {
        title: title.to_owned(),
        company: company.to_owned(),
        location: location.to_owned(),
        salary: (!salary.is_empty()).then(|| salary.to_owned()),
        description: description.to_owned(),
    })
}

/// Raw application submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplyForm {
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default)]
    pub csrf_token: String,
}

/// Validate an application submission.
pub fn validate_application(form: &ApplyForm) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::default();
    let cover_letter = form.cover_letter.trim();
    if cover_letter.is_empty() {
        errors.push("cover_letter", "cover letter must not be empty");
    }
    if errors.is_empty() {
        Ok(cover_letter.to_owned())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn registration(username: &str, email: &str, role: &str, pw: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_owned(),
            email: email.to_owned(),
            role: role.to_owned(),
            password: pw.to_owned(),
            confirm_password: confirm.to_owned(),
            csrf_token: String::new(),
        }
    }

    #[test]
    fn valid_registration_is_normalised() {
        let form = registration("  alice  ", " Alice@Example.com ", "jobseeker", "pw", "pw");
        let valid = validate_registration(&form).expect("valid form");
        assert_eq!(valid.username.as_ref(), "alice");
        assert_eq!(valid.email.as_ref(), "alice@example.com");
        assert_eq!(valid.role, Role::Jobseeker);
        assert_eq!(valid.password, "pw");
    }

    #[rstest]
    #[case(registration("abc", "a@b.com", "jobseeker", "pw", "pw"), "username")]
    #[case(registration("alice", "not-an-email", "jobseeker", "pw", "pw"), "email")]
    #[case(registration("alice", "a@b.com", "admin", "pw", "pw"), "role")]
    #[case(registration("alice", "a@b.com", "jobseeker", "", ""), "password")]
    #[case(registration("alice", "a@b.com", "jobseeker", "pw", "other"), "confirm_password")]
    fn invalid_registration_names_the_field(#[case] form: RegisterForm, #[case] field: &str) {
        let errors = validate_registration(&form).expect_err("must fail");
        assert!(errors.get(field).is_some(), "expected error on {field}");
    }

    #[test]
    fn every_bad_field_is_reported_at_once() {
        let form = registration("x", "bad", "none", "", "mismatch");
        let errors = validate_registration(&form).expect_err("must fail");
        for field in ["username", "email", "role", "password", "confirm_password"] {
            assert!(errors.get(field).is_some(), "missing error on {field}");
        }
    }

    #[test]
    fn login_checkbox_presence_means_remember() {
        let mut form = LoginForm {
            email: "a@b.com".to_owned(),
            password: "pw".to_owned(),
            remember: Some("on".to_owned()),
            csrf_token: String::new(),
        };
        assert!(validate_login(&form).expect("valid").remember);
        form.remember = None;
        assert!(!validate_login(&form).expect("valid").remember);
    }

    #[test]
    fn job_salary_is_optional_and_trimmed() {
        let mut form = JobForm {
            title: "Backend Engineer".to_owned(),
            company: "Initech".to_owned(),
            location: "Remote".to_owned(),
            salary: "  ".to_owned(),
            description: "Ship things".to_owned(),
            csrf_token: String::new(),
        };
        assert_eq!(validate_job(&form).expect("valid").salary, None);
        form.salary = " £50k ".to_owned();
        assert_eq!(
            validate_job(&form).expect("valid").salary.as_deref(),
            Some("£50k")
        );
    }

    #[test]
    fn blank_job_fields_each_get_an_error() {
        let form = JobForm::default();
        let errors = validate_job(&form).expect_err("must fail");
        for field in ["title", "company", "location", "description"] {
            assert!(errors.get(field).is_some(), "missing error on {field}");
        }
    }

    #[test]
    fn blank_cover_letter_is_rejected() {
        let form = ApplyForm::default();
        let errors = validate_application(&form).expect_err("must fail");
        assert!(errors.get("cover_letter").is_some());
    }
}
