use hotelier_postgres::model::User;
use hotelier_postgres::types::{Gender, UserRole};
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// User representation returned by the users endpoints.
///
/// The password digest never leaves the storage layer; this view carries
/// only profile and access-control fields.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// Unique user identifier.
    pub id: i32,
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Patronymic; empty string when not supplied.
    pub patronymic: String,
    /// Unique login name.
    pub username: String,
    /// Date of birth.
    pub date_of_birth: Date,
    /// Phone number.
    pub phone_number: String,
    /// Registration address.
    pub registration_address: String,
    /// Gender marker.
    pub gender: Gender,
    /// Access-control role.
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            surname: user.surname,
            patronymic: user.patronymic,
            username: user.username,
            date_of_birth: user.date_of_birth.into(),
            phone_number: user.phone_number,
            registration_address: user.registration_address,
            gender: user.gender,
            role: user.role,
        }
    }
}
