//! User identity model: roles, validated identifiers, and credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    UsernameTooShort { min: usize },
    UsernameTooLong { max: usize },
    EmptyEmail,
    InvalidEmail,
    UnknownRole,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::UnknownRole => write!(f, "role must be jobseeker or employer"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account role, fixed at registration.
///
/// There is no promotion or demotion flow: the role a user registers
/// with is the role they keep, enforced by the absence of any mutation
/// API rather than by a runtime guard. Admin accounts are seeded at
/// startup, never self-registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employer,
    Jobseeker,
}

impl Role {
    /// Storage and form encoding for the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employer => "employer",
            Self::Jobseeker => "jobseeker",
        }
    }

    /// Parse a stored or submitted role string.
    pub fn parse(value: &str) -> Result<Self, UserValidationError> {
        match value {
            "admin" => Ok(Self::Admin),
            "employer" => Ok(Self::Employer),
            "jobseeker" => Ok(Self::Jobseeker),
            _ => Err(UserValidationError::UnknownRole),
        }
    }

    /// Parse a role submitted on the registration form.
    ///
    /// Only `jobseeker` and `employer` are offered there; `admin` is
    /// rejected even though it parses as a stored role.
    pub fn parse_registerable(value: &str) -> Result<Self, UserValidationError> {
        match Self::parse(value)? {
            Self::Admin => Err(UserValidationError::UnknownRole),
            role => Ok(role),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 4;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 64;

/// Unique handle shown next to postings and applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`], trimming surrounding
    /// whitespace first.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        let length = trimmed.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Login identifier, validated for rough email shape.
///
/// The check is deliberately loose (`local@domain.tld`); delivery is
/// not verified here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`], trimming whitespace
    /// and lowercasing so lookups are case-insensitive.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let Some((local, domain)) = trimmed.rsplit_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty()
            || domain.is_empty()
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque salted password hash.
///
/// Only ever produced by the hasher port and compared by it; the
/// plaintext never reaches storage and the hash never reaches a page.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash string produced by the hasher.
    #[must_use]
    pub fn new(encoded: String) -> Self {
        Self(encoded)
    }

    /// Encoded hash for storage or verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub role: Role,
}

/// A validated account ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyUsername)]
    #[case("   ", UserValidationError::EmptyUsername)]
    #[case("abc", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
    fn short_usernames_are_rejected(#[case] input: &str, #[case] expected: UserValidationError) {
        assert_eq!(Username::new(input).expect_err("must fail"), expected);
    }

    #[test]
    fn overlong_username_is_rejected() {
        let input = "x".repeat(USERNAME_MAX + 1);
        assert_eq!(
            Username::new(input).expect_err("must fail"),
            UserValidationError::UsernameTooLong { max: USERNAME_MAX }
        );
    }

    #[test]
    fn username_is_trimmed() {
        let username = Username::new("  alice  ").expect("valid");
        assert_eq!(username.as_ref(), "alice");
    }

    #[rstest]
    #[case("plainaddress")]
    #[case("@missing-local.com")]
    #[case("user@")]
    #[case("user@nodot")]
    #[case("user@.leading.dot")]
    #[case("user name@example.com")]
    fn malformed_emails_are_rejected(#[case] input: &str) {
        assert_eq!(
            EmailAddress::new(input).expect_err("must fail"),
            UserValidationError::InvalidEmail
        );
    }

    #[test]
    fn emails_are_lowercased() {
        let email = EmailAddress::new(" Alice@Example.COM ").expect("valid");
        assert_eq!(email.as_ref(), "alice@example.com");
    }

    #[rstest]
    #[case("jobseeker", Role::Jobseeker)]
    #[case("employer", Role::Employer)]
    #[case("admin", Role::Admin)]
    fn roles_round_trip(#[case] encoded: &str, #[case] role: Role) {
        assert_eq!(Role::parse(encoded).expect("valid"), role);
        assert_eq!(role.as_str(), encoded);
    }

    #[rstest]
    #[case("admin")]
    #[case("superuser")]
    fn registration_roles_exclude_admin(#[case] input: &str) {
        assert_eq!(
            Role::parse_registerable(input).expect_err("must fail"),
            UserValidationError::UnknownRole
        );
    }

    #[test]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$2b$12$secret".to_owned());
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }
}
