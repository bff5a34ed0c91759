//! Ordered fail-fast input validation.
//!
//! Rules for a field run in a fixed order and the first failure wins: the
//! reported message always names the earliest broken rule, never a later
//! one. The pipeline is pure and synchronous; anything that needs storage
//! (such as username uniqueness) is looked up by the caller beforehand and
//! passed in as a plain flag.

mod user;

pub use user::{CreateUserInput, UpdateUserInput, ValidCreateUser, ValidUpdateUser};

use crate::handler::{Error, ErrorKind};

/// A failed validation rule, carrying its user-facing message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub &'static str);

impl ValidationError {
    /// Returns the user-facing message.
    #[inline]
    pub fn message(&self) -> &'static str {
        self.0
    }
}

impl From<ValidationError> for Error<'static> {
    fn from(error: ValidationError) -> Self {
        ErrorKind::BadRequest.with_message(error.0)
    }
}
