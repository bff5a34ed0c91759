//! Security services: password hashing and session tokens.

mod password_hasher;
mod session_lifecycle;
mod token_signer;

pub use password_hasher::PasswordHasher;
pub use session_lifecycle::{RefreshDecision, issue_or_reuse};
pub use token_signer::{SessionClaims, TokenError, TokenSigner};
