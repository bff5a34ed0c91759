//! Gender enumeration for user profile records.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Gender of a user principal.
///
/// This enumeration corresponds to the `GENDER` PostgreSQL enum. Parsing an
/// unknown value with [`str::parse`] fails with [`strum::ParseError`] rather
/// than constructing an out-of-range variant.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::Gender"]
pub enum Gender {
    /// Male gender marker.
    #[db_rename = "male"]
    #[serde(rename = "male")]
    #[strum(serialize = "male")]
    #[default]
    Male,

    /// Female gender marker.
    #[db_rename = "female"]
    #[serde(rename = "female")]
    #[strum(serialize = "female")]
    Female,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_values() {
        assert_eq!("male".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!("female".parse::<Gender>(), Ok(Gender::Female));
    }

    #[test]
    fn rejects_unknown_values() {
        assert!("other".parse::<Gender>().is_err());
        assert!("MALE".parse::<Gender>().is_err());
        assert!("".parse::<Gender>().is_err());
    }
}
