//! Shared database types: closed enumerations and constraint violations.

mod constraint;
mod enums;

pub use self::constraint::{ConstraintViolation, SessionTokenConstraints, UserConstraints};
pub use self::enums::{Gender, UserRole};
