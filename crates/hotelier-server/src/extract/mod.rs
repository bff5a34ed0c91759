//! Custom HTTP request extractors.

pub mod auth;

pub use crate::extract::auth::{CurrentUser, authorize, authorize_with_message};
pub use crate::{TRACING_TARGET_AUTHENTICATION, TRACING_TARGET_AUTHORIZATION};
