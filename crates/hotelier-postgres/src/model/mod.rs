//! Database models for all entities in the system.

mod session_token;
mod user;

pub use self::session_token::{NewSessionToken, SessionToken};
pub use self::user::{NewUser, UpdateUser, User};
