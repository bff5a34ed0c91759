//! Closed database enumerations.
//!
//! Every enum here corresponds to a PostgreSQL enum type and parses from its
//! wire representation with [`FromStr`], returning a typed error on unknown
//! input instead of panicking.
//!
//! [`FromStr`]: std::str::FromStr

mod gender;
mod user_role;

pub use self::gender::Gender;
pub use self::user_role::UserRole;
