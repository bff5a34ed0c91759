//! Database constraint violations, mapped from constraint names.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// `users` table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
pub enum UserConstraints {
    #[strum(serialize = "users_username_unique_idx")]
    UsernameUnique,
    #[strum(serialize = "users_phone_number_unique_idx")]
    PhoneNumberUnique,
    #[strum(serialize = "users_username_length")]
    UsernameLength,
    #[strum(serialize = "users_hashed_password_not_empty")]
    HashedPasswordNotEmpty,
}

impl UserConstraints {
    /// Creates a new [`UserConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }
}

/// `session_tokens` table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
pub enum SessionTokenConstraints {
    #[strum(serialize = "session_tokens_user_id_unique_idx")]
    UserIdUnique,
    #[strum(serialize = "session_tokens_token_unique_idx")]
    TokenUnique,
}

impl SessionTokenConstraints {
    /// Creates a new [`SessionTokenConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }
}

/// Unified constraint violation enum covering every table in the schema.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum ConstraintViolation {
    /// Violation of a `users` table constraint.
    User(UserConstraints),
    /// Violation of a `session_tokens` table constraint.
    SessionToken(SessionTokenConstraints),
}

impl ConstraintViolation {
    /// Creates a new [`ConstraintViolation`] from a Postgres constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        if let Some(c) = UserConstraints::new(constraint) {
            return Some(Self::User(c));
        }

        SessionTokenConstraints::new(constraint).map(Self::SessionToken)
    }

    /// Returns whether this violation comes from a uniqueness constraint.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::User(UserConstraints::UsernameUnique)
                | Self::User(UserConstraints::PhoneNumberUnique)
                | Self::SessionToken(SessionTokenConstraints::UserIdUnique)
                | Self::SessionToken(SessionTokenConstraints::TokenUnique)
        )
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(c) => c.fmt(f),
            Self::SessionToken(c) => c.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_constraint_names() {
        let violation = ConstraintViolation::new("users_username_unique_idx");
        assert_eq!(
            violation,
            Some(ConstraintViolation::User(UserConstraints::UsernameUnique))
        );
        assert!(violation.unwrap().is_unique_violation());

        let violation = ConstraintViolation::new("session_tokens_user_id_unique_idx");
        assert_eq!(
            violation,
            Some(ConstraintViolation::SessionToken(
                SessionTokenConstraints::UserIdUnique
            ))
        );
    }

    #[test]
    fn unknown_constraint_names_map_to_none() {
        assert_eq!(ConstraintViolation::new("bookings_room_id_fkey"), None);
        assert_eq!(ConstraintViolation::new(""), None);
    }

    #[test]
    fn check_constraints_are_not_unique_violations() {
        let violation = ConstraintViolation::new("users_username_length").unwrap();
        assert!(!violation.is_unique_violation());
    }
}
