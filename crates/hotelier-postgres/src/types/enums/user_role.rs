//! User role enumeration for access control decisions.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Role of a user principal.
///
/// This enumeration corresponds to the `USER_ROLE` PostgreSQL enum.
/// Authorization is pure set membership over these variants: no privilege
/// hierarchy is implied, and an admin is not implicitly granted access to
/// operations scoped to other roles.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::UserRole"]
pub enum UserRole {
    /// Regular hotel staff user.
    #[db_rename = "user"]
    #[serde(rename = "user")]
    #[strum(serialize = "user")]
    #[default]
    User,

    /// Hotel client (guest).
    #[db_rename = "client"]
    #[serde(rename = "client")]
    #[strum(serialize = "client")]
    Client,

    /// Administrator with access to user management.
    #[db_rename = "admin"]
    #[serde(rename = "admin")]
    #[strum(serialize = "admin")]
    Admin,
}

impl UserRole {
    /// Returns whether this role is the administrator role.
    #[inline]
    pub fn is_admin(self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_values() {
        assert_eq!("user".parse::<UserRole>(), Ok(UserRole::User));
        assert_eq!("client".parse::<UserRole>(), Ok(UserRole::Client));
        assert_eq!("admin".parse::<UserRole>(), Ok(UserRole::Admin));
    }

    #[test]
    fn rejects_unknown_values() {
        assert!("root".parse::<UserRole>().is_err());
        assert!("Admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() -> anyhow::Result<()> {
        let json = serde_json::to_string(&UserRole::Client)?;
        assert_eq!(json, "\"client\"");
        let role: UserRole = serde_json::from_str("\"admin\"")?;
        assert_eq!(role, UserRole::Admin);
        Ok(())
    }
}
