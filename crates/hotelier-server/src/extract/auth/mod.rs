//! Authentication and authorization extractors.

mod current_user;
mod permission;

pub use current_user::CurrentUser;
pub use permission::{authorize, authorize_with_message};
