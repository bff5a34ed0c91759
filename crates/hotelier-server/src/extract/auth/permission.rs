//! Role-based authorization gate.
//!
//! Authorization runs after authentication has already produced a verified
//! user. The gate is a plain allow-list over roles; admin is just another
//! role and grants nothing unless listed.

use hotelier_postgres::types::UserRole;

use crate::TRACING_TARGET_AUTHORIZATION;
use crate::extract::CurrentUser;
use crate::handler::{ErrorKind, Result};

/// Checks a role against an allow-list.
///
/// Returns `Ok(())` when `role` appears in `allowed`, otherwise a 403 with
/// the fixed "you don't have access" message.
pub fn authorize(role: UserRole, allowed: &[UserRole]) -> Result<()> {
    authorize_with_message(role, allowed, "you don't have access")
}

/// Checks a role against an allow-list with a caller-supplied denial message.
pub fn authorize_with_message(
    role: UserRole,
    allowed: &[UserRole],
    message: &'static str,
) -> Result<()> {
    if allowed.contains(&role) {
        return Ok(());
    }

    tracing::debug!(
        target: TRACING_TARGET_AUTHORIZATION,
        role = %role,
        allowed = ?allowed,
        "authorization denied"
    );

    Err(ErrorKind::Forbidden.with_message(message))
}

impl CurrentUser {
    /// Requires the authenticated user to hold one of the allowed roles.
    pub fn authorize(&self, allowed: &[UserRole]) -> Result<()> {
        authorize(self.role, allowed)
    }

    /// Requires the authenticated user to be an administrator.
    pub fn authorize_admin(&self) -> Result<()> {
        self.authorize(&[UserRole::Admin])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listed_role_is_allowed() {
        assert!(authorize(UserRole::Admin, &[UserRole::Admin]).is_ok());
        assert!(authorize(UserRole::User, &[UserRole::Admin, UserRole::User]).is_ok());
    }

    #[test]
    fn unlisted_role_is_forbidden() {
        let error = authorize(UserRole::User, &[UserRole::Admin])
            .expect_err("user role must not pass an admin-only gate");

        assert_eq!(error.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn admin_is_not_implicitly_allowed() {
        // An allow-list naming only User does not admit Admin.
        let error = authorize(UserRole::Admin, &[UserRole::User])
            .expect_err("admin must not pass a user-only gate");

        assert_eq!(error.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn empty_allow_list_denies_everyone() {
        assert!(authorize(UserRole::Admin, &[]).is_err());
        assert!(authorize(UserRole::User, &[]).is_err());
    }

    #[test]
    fn custom_denial_message_is_carried() {
        let error = authorize_with_message(UserRole::User, &[UserRole::Admin], "admins only")
            .expect_err("user role must not pass an admin-only gate");

        assert_eq!(error.kind(), ErrorKind::Forbidden);
        assert_eq!(error.message(), Some("admins only"));
    }

    #[test]
    fn forbidden_uses_fixed_message() {
        use axum::response::IntoResponse;

        let error = authorize(UserRole::User, &[UserRole::Admin]).unwrap_err();
        let response = error.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::FORBIDDEN);
    }
}
