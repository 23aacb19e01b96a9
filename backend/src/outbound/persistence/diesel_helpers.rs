//! Shared error mapping for the Diesel repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::ports::StoreError;

use super::models::CorruptRow;
use super::pool::PoolError;

/// Map a Diesel execution error to the port error taxonomy.
///
/// Unique-constraint violations become [`StoreError::Conflict`]
/// attributed to the violated column, so callers can treat the
/// database as the authoritative uniqueness check.
pub(super) fn map_diesel_error(error: DieselError) -> StoreError {
    match error {
        DieselError::NotFound => StoreError::NotFound,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StoreError::conflict(conflict_field(info.constraint_name()))
        }
        other => StoreError::query(other.to_string()),
    }
}

/// Attribute a unique violation to the field a form can annotate.
fn conflict_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(name) if name.contains("username") => "username",
        Some(name) if name.contains("email") => "email",
        Some(name) if name.contains("applications") => "application",
        _ => "record",
    }
}

pub(super) fn map_pool_error(error: PoolError) -> StoreError {
    StoreError::connection(error.to_string())
}

pub(super) fn map_corrupt_row(error: CorruptRow) -> StoreError {
    StoreError::query(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_not_found() {
        assert_eq!(map_diesel_error(DieselError::NotFound), StoreError::NotFound);
    }

    #[test]
    fn conflict_field_names_follow_constraints() {
        assert_eq!(conflict_field(Some("users_username_key")), "username");
        assert_eq!(conflict_field(Some("users_email_key")), "email");
        assert_eq!(
            conflict_field(Some("applications_user_id_job_id_key")),
            "application"
        );
        assert_eq!(conflict_field(None), "record");
    }
}
