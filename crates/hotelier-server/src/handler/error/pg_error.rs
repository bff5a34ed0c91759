//! Database error to HTTP error conversion handlers.
//!
//! Converts [`PgError`] values and known constraint violations into HTTP
//! error responses via the `From` trait. Storage failures always surface as
//! 500s; they are logged here and never silently swallowed.

use hotelier_postgres::PgError;
use hotelier_postgres::types::{ConstraintViolation, SessionTokenConstraints, UserConstraints};

use crate::handler::{Error, ErrorKind};

const TRACING_TARGET: &str = "hotelier_server::postgres_constraints";

impl From<ConstraintViolation> for Error<'static> {
    fn from(constraint: ConstraintViolation) -> Self {
        match constraint {
            ConstraintViolation::User(c) => c.into(),
            ConstraintViolation::SessionToken(c) => c.into(),
        }
    }
}

impl From<UserConstraints> for Error<'static> {
    fn from(constraint: UserConstraints) -> Self {
        match constraint {
            UserConstraints::UsernameUnique => ErrorKind::Conflict
                .with_message("User with this username already exists")
                .with_resource("users"),
            UserConstraints::PhoneNumberUnique => ErrorKind::Conflict
                .with_message("User with this phone number already exists")
                .with_resource("users"),
            UserConstraints::UsernameLength | UserConstraints::HashedPasswordNotEmpty => {
                ErrorKind::BadRequest.with_resource("users")
            }
        }
    }
}

impl From<SessionTokenConstraints> for Error<'static> {
    fn from(constraint: SessionTokenConstraints) -> Self {
        // Token rows are managed entirely by the session lifecycle; a
        // violation here means concurrent logins raced, which the upsert
        // resolves. Anything surfacing to a handler is a conflict.
        match constraint {
            SessionTokenConstraints::UserIdUnique | SessionTokenConstraints::TokenUnique => {
                ErrorKind::Conflict.with_resource("sessions")
            }
        }
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        match error {
            PgError::Config(config_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %config_error,
                    "database configuration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Timeout(timeout) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    timeout = ?timeout,
                    "database timeout",
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Connection(connection_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %connection_error,
                    "database connection error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Migration(migration_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %migration_error,
                    "database migration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Query(ref query_error) => {
                if let Some(constraint_name) = error.constraint()
                    && let Some(constraint) = ConstraintViolation::new(constraint_name)
                {
                    tracing::error!(
                        target: TRACING_TARGET,
                        constraint = constraint_name,
                        error = %query_error,
                        "query error (constraint violation)"
                    );
                    return constraint.into();
                }

                tracing::error!(
                    target: TRACING_TARGET,
                    error = %query_error,
                    "query error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Unexpected(unexpected_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %unexpected_error,
                    "unexpected database error"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}

// Used only for transactions.
impl From<hotelier_postgres::DieselError> for Error<'static> {
    fn from(error: hotelier_postgres::DieselError) -> Self {
        let pg_error: PgError = error.into();
        pg_error.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_unique_violation_is_conflict() {
        let error: Error<'static> = UserConstraints::UsernameUnique.into();
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.message(), Some("User with this username already exists"));
    }

    #[test]
    fn query_error_without_constraint_is_internal() {
        let error: Error<'static> =
            PgError::Query(hotelier_postgres::DieselError::NotFound).into();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }
}
