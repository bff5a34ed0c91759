//! Response payloads shared by the HTTP handlers.

mod error_response;
mod user;

pub use self::error_response::ErrorResponse;
pub use self::user::UserResponse;
