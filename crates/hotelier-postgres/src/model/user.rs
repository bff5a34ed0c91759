//! User principal model for PostgreSQL database operations.
//!
//! ## Models
//!
//! - [`User`] - Main user model with profile fields and access-control state
//! - [`NewUser`] - Data structure for creating new user principals
//! - [`UpdateUser`] - Partial changeset for updating existing users

use diesel::prelude::*;
use jiff_diesel::{Date, Timestamp};

use crate::schema::users;
use crate::types::{Gender, UserRole};

/// Main user model representing a persisted user principal.
///
/// The password is stored only as a salted one-way hash; the plaintext never
/// reaches this layer. `created_at` is set once by the database at insertion.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Unique user identifier.
    pub id: i32,
    /// Given name (Cyrillic, 2-50 characters).
    pub name: String,
    /// Family name (Cyrillic, 2-50 characters).
    pub surname: String,
    /// Patronymic; empty string when not supplied.
    pub patronymic: String,
    /// Unique login name (ASCII letters and digits, 4-20 characters).
    pub username: String,
    /// Salted one-way password digest in PHC string format.
    pub hashed_password: String,
    /// Date of birth.
    pub date_of_birth: Date,
    /// Unique phone number (optional leading `+`, 10-15 digits).
    pub phone_number: String,
    /// Registration address (5-100 characters).
    pub registration_address: String,
    /// Gender marker.
    pub gender: Gender,
    /// Access-control role.
    pub role: UserRole,
    /// Whether the user is banned from the system.
    pub is_banned: bool,
    /// Timestamp when the user record was created.
    pub created_at: Timestamp,
}

/// Data for creating a new user principal.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Patronymic; empty string when not supplied.
    pub patronymic: String,
    /// Unique login name.
    pub username: String,
    /// Salted one-way password digest.
    pub hashed_password: String,
    /// Date of birth.
    pub date_of_birth: Date,
    /// Unique phone number.
    pub phone_number: String,
    /// Registration address.
    pub registration_address: String,
    /// Gender marker.
    pub gender: Gender,
    /// Access-control role.
    pub role: UserRole,
}

/// Partial changeset for updating a user.
///
/// Only fields set to `Some(value)` are written; everything else is left
/// untouched by the merge.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateUser {
    /// Given name.
    pub name: Option<String>,
    /// Family name.
    pub surname: Option<String>,
    /// Patronymic.
    pub patronymic: Option<String>,
    /// Unique login name.
    pub username: Option<String>,
    /// Salted one-way password digest.
    pub hashed_password: Option<String>,
    /// Date of birth.
    pub date_of_birth: Option<Date>,
    /// Unique phone number.
    pub phone_number: Option<String>,
    /// Registration address.
    pub registration_address: Option<String>,
    /// Gender marker.
    pub gender: Option<Gender>,
    /// Access-control role.
    pub role: Option<UserRole>,
    /// Whether the user is banned.
    pub is_banned: Option<bool>,
}

impl User {
    /// Returns whether the user may authenticate.
    #[inline]
    pub fn can_login(&self) -> bool {
        !self.is_banned
    }

    /// Returns whether the user holds the administrator role.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns whether the user has a patronymic recorded.
    pub fn has_patronymic(&self) -> bool {
        !self.patronymic.is_empty()
    }

    /// Returns the full display name: surname, name and optional patronymic.
    pub fn full_name(&self) -> String {
        if self.has_patronymic() {
            format!("{} {} {}", self.surname, self.name, self.patronymic)
        } else {
            format!("{} {}", self.surname, self.name)
        }
    }
}

impl UpdateUser {
    /// Returns whether this changeset writes no columns at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.patronymic.is_none()
            && self.username.is_none()
            && self.hashed_password.is_none()
            && self.date_of_birth.is_none()
            && self.phone_number.is_none()
            && self.registration_address.is_none()
            && self.gender.is_none()
            && self.role.is_none()
            && self.is_banned.is_none()
    }
}
