//! Session token model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::session_tokens;

/// Stored session token row binding one signed token string to one user.
///
/// At most one row exists per user (enforced by a uniqueness constraint on
/// `user_id`); a refresh overwrites the `token` column in place rather than
/// inserting a second row.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = session_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SessionToken {
    /// Unique row identifier.
    pub id: i32,
    /// Reference to the user this token belongs to.
    pub user_id: i32,
    /// The signed token string.
    pub token: String,
    /// Timestamp of first issuance.
    pub created_at: Timestamp,
    /// Timestamp of the last overwrite (refresh).
    pub updated_at: Timestamp,
}

/// Data for creating a new session token row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = session_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSessionToken {
    /// Reference to the user this token belongs to.
    pub user_id: i32,
    /// The signed token string.
    pub token: String,
}
