//! Account services: registration and credential authentication.
//!
//! Handlers call these instead of talking to the repositories
//! directly so the uniqueness pre-checks, hashing, and the conflict
//! backstop live in one testable place.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::forms::{FieldErrors, RegisterForm, validate_registration};
use crate::domain::ports::{PasswordHasher, StoreError, UserRepository};
use crate::domain::{EmailAddress, Error, NewUser, Role, User, Username};

/// Outcome of a registration attempt.
#[derive(Debug)]
pub enum RegisterOutcome {
    /// The account was created; the caller should redirect to login.
    Created(User),
    /// Field validation or a uniqueness check failed; re-render the
    /// form with these annotations.
    Invalid(FieldErrors),
    /// The store's unique constraint rejected the insert after the
    /// pre-checks passed (a concurrent registration won the race).
    Conflict,
}

/// Validate a registration submission and create the account.
///
/// Username and email uniqueness are each pre-checked independently so
/// both can surface field-specific errors in one pass. The storage
/// constraint remains the authoritative guarantee; losing the race
/// yields [`RegisterOutcome::Conflict`], not a partial write.
pub async fn register(
    users: &Arc<dyn UserRepository>,
    hasher: &Arc<dyn PasswordHasher>,
    form: &RegisterForm,
) -> Result<RegisterOutcome, Error> {
    let valid = match validate_registration(form) {
        Ok(valid) => valid,
        Err(errors) => return Ok(RegisterOutcome::Invalid(errors)),
    };

    let mut errors = FieldErrors::default();
    if users.username_exists(&valid.username).await? {
        errors.push("username", "username already taken");
    }
    if users.email_exists(&valid.email).await? {
        errors.push("email", "email already registered");
    }
    if !errors.is_empty() {
        return Ok(RegisterOutcome::Invalid(errors));
    }

    let password_hash = hasher.hash(&valid.password).await?;
    let new_user = NewUser {
        username: valid.username,
        email: valid.email,
        password_hash,
        role: valid.role,
    };

    match users.create(new_user).await {
        Ok(user) => {
            info!(user_id = %user.id, role = %user.role, "account registered");
            Ok(RegisterOutcome::Created(user))
        }
        Err(StoreError::Conflict { field }) => {
            warn!(field, "registration lost a uniqueness race");
            Ok(RegisterOutcome::Conflict)
        }
        Err(err) => Err(err.into()),
    }
}

/// Verify an email/password pair against the stored credential.
///
/// Returns `None` for an unknown email or a wrong password; the two
/// cases are indistinguishable to the caller by design.
pub async fn authenticate(
    users: &Arc<dyn UserRepository>,
    hasher: &Arc<dyn PasswordHasher>,
    email: &EmailAddress,
    password: &str,
) -> Result<Option<User>, Error> {
    let Some(user) = users.find_by_email(email).await? else {
        return Ok(None);
    };
    if hasher.verify(password, &user.password_hash).await? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

/// Create the admin account when none exists yet.
///
/// Invoked at startup behind a configuration flag; a no-op when an
/// admin is already present.
pub async fn ensure_admin(
    users: &Arc<dyn UserRepository>,
    hasher: &Arc<dyn PasswordHasher>,
    email: &str,
    password: &str,
) -> Result<bool, Error> {
    if users.any_with_role(Role::Admin).await? {
        return Ok(false);
    }

    let username = Username::new("admin")
        .map_err(|err| Error::internal(format!("invalid seed username: {err}")))?;
    let email = EmailAddress::new(email)
        .map_err(|err| Error::invalid_request(format!("invalid admin email: {err}")))?;
    let password_hash = hasher.hash(password).await?;

    match users
        .create(NewUser {
            username,
            email,
            password_hash,
            role: Role::Admin,
        })
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, "admin account seeded");
            Ok(true)
        }
        // Another instance seeded concurrently; that admin wins.
        Err(StoreError::Conflict { .. }) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::memory::MemoryStore;
    use crate::outbound::BcryptHasher;

    fn deps() -> (Arc<dyn UserRepository>, Arc<dyn PasswordHasher>) {
        (
            Arc::new(MemoryStore::new()),
            Arc::new(BcryptHasher::with_cost(4)),
        )
    }

    fn form(username: &str, email: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_owned(),
            email: email.to_owned(),
            role: "jobseeker".to_owned(),
            password: "hunter2!".to_owned(),
            confirm_password: "hunter2!".to_owned(),
            csrf_token: String::new(),
        }
    }

    #[tokio::test]
    async fn second_registration_with_same_username_fails_validation() {
        let (users, hasher) = deps();
        let outcome = register(&users, &hasher, &form("alice", "a@example.com"))
            .await
            .expect("no store error");
        assert!(matches!(outcome, RegisterOutcome::Created(_)));

        let outcome = register(&users, &hasher, &form("alice", "other@example.com"))
            .await
            .expect("no store error");
        let RegisterOutcome::Invalid(errors) = outcome else {
            panic!("expected field errors");
        };
        assert_eq!(errors.get("username"), Some("username already taken"));
        assert!(errors.get("email").is_none());
    }

    #[tokio::test]
    async fn second_registration_with_same_email_fails_validation() {
        let (users, hasher) = deps();
        register(&users, &hasher, &form("alice", "a@example.com"))
            .await
            .expect("no store error");

        let outcome = register(&users, &hasher, &form("bobby", "a@example.com"))
            .await
            .expect("no store error");
        let RegisterOutcome::Invalid(errors) = outcome else {
            panic!("expected field errors");
        };
        assert_eq!(errors.get("email"), Some("email already registered"));
        assert!(errors.get("username").is_none());
    }

    #[tokio::test]
    async fn password_is_stored_hashed_and_verifiable() {
        let (users, hasher) = deps();
        let outcome = register(&users, &hasher, &form("alice", "a@example.com"))
            .await
            .expect("no store error");
        let RegisterOutcome::Created(user) = outcome else {
            panic!("expected creation");
        };
        assert_ne!(user.password_hash.expose(), "hunter2!");

        let email = EmailAddress::new("a@example.com").expect("valid email");
        let found = authenticate(&users, &hasher, &email, "hunter2!")
            .await
            .expect("no error");
        assert!(found.is_some());

        let rejected = authenticate(&users, &hasher, &email, "wrong")
            .await
            .expect("no error");
        assert!(rejected.is_none());
    }

    #[tokio::test]
    async fn unknown_email_authenticates_as_none() {
        let (users, hasher) = deps();
        let email = EmailAddress::new("ghost@example.com").expect("valid email");
        let found = authenticate(&users, &hasher, &email, "whatever")
            .await
            .expect("no error");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn admin_is_seeded_once() {
        let (users, hasher) = deps();
        let created = ensure_admin(&users, &hasher, "admin@example.com", "changeme")
            .await
            .expect("seed");
        assert!(created);
        let again = ensure_admin(&users, &hasher, "admin@example.com", "changeme")
            .await
            .expect("seed");
        assert!(!again);
    }
}
