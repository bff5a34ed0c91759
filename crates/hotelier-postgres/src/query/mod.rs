//! Database query repositories for all entities in the system.
//!
//! This module contains repository traits implemented directly on the pooled
//! connection, encapsulating common query patterns behind type-safe
//! interfaces. Every method runs within the scope of the connection it is
//! handed; no repository holds state of its own.

mod session_token;
mod user;

pub use self::session_token::SessionTokenRepository;
pub use self::user::UserRepository;
