//! Authentication handlers for login and logout.
//!
//! Login verifies credentials and returns the user's session token in the
//! `Authorization` response header. A missing account and a wrong password
//! surface as different errors, so a dummy hash verification keeps their
//! timing indistinguishable. Logout deletes the stored token row, which
//! invalidates every copy of the token at once.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use hotelier_postgres::PgClient;
use hotelier_postgres::query::{SessionTokenRepository, UserRepository};
use hotelier_postgres::types::UserRole;
use serde::{Deserialize, Serialize};

use crate::extract::CurrentUser;
use crate::handler::{ErrorKind, Result};
use crate::service::{PasswordHasher, ServiceState, TokenSigner, issue_or_reuse};

const TRACING_TARGET: &str = "hotelier_server::handler::authentication";

/// Request payload for login.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoginRequest {
    /// Username of the account.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Response returned after successful login.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
struct LoginResponse {
    /// ID of the authenticated user.
    pub user_id: i32,
    /// Role of the authenticated user.
    pub role: UserRole,
}

/// `POST /auth/login`
///
/// Issues a session token, reusing or refreshing the user's stored token
/// when one exists. The token travels in the `Authorization` header of the
/// response.
async fn login(
    State(postgres): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(token_signer): State<TokenSigner>,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, TypedHeader<Authorization<Bearer>>, Json<LoginResponse>)> {
    let mut conn = postgres.get_connection().await?;

    let Some(user) = conn.find_user_by_username(&request.username).await? else {
        // Burn the same time a real verification would take.
        password_hasher.verify_dummy_password(&request.password);

        tracing::debug!(
            target: TRACING_TARGET,
            username = %request.username,
            "login attempt for unknown username"
        );

        return Err(ErrorKind::NotFound
            .with_message("user not found")
            .with_resource("users")
            .into_static());
    };

    password_hasher.verify_password(&request.password, &user.hashed_password)?;

    if !user.can_login() {
        tracing::warn!(
            target: TRACING_TARGET,
            user_id = user.id,
            "login attempt by banned user"
        );
        return Err(ErrorKind::Forbidden.into_error());
    }

    let token = issue_or_reuse(&mut conn, &token_signer, &user).await?;
    let authorization = Authorization::bearer(&token).map_err(|e| {
        tracing::error!(
            target: TRACING_TARGET,
            error = %e,
            "issued token is not a valid header value"
        );
        ErrorKind::InternalServerError.into_error()
    })?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = user.id,
        role = %user.role,
        "user logged in"
    );

    let response = LoginResponse {
        user_id: user.id,
        role: user.role,
    };

    Ok((
        StatusCode::CREATED,
        TypedHeader(authorization),
        Json(response),
    ))
}

/// `POST /auth/logout`
///
/// Deletes the authenticated user's session row. Idempotent: logging out
/// twice is not an error.
async fn logout(
    State(postgres): State<PgClient>,
    current_user: CurrentUser,
) -> Result<StatusCode> {
    let mut conn = postgres.get_connection().await?;
    let deleted = conn.delete_token_by_user_id(current_user.id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = current_user.id,
        deleted,
        "user logged out"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Returns a [`Router`] with all authentication routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_deserializes() -> anyhow::Result<()> {
        let request: LoginRequest =
            serde_json::from_str(r#"{"username":"ivanov1","password":"secret123"}"#)?;
        assert_eq!(request.username, "ivanov1");
        assert_eq!(request.password, "secret123");
        Ok(())
    }

    #[test]
    fn login_response_serializes_role_by_wire_name() -> anyhow::Result<()> {
        let response = LoginResponse {
            user_id: 7,
            role: UserRole::Admin,
        };

        let json = serde_json::to_value(&response)?;
        assert_eq!(json["user_id"], 7);
        assert_eq!(json["role"], "admin");
        Ok(())
    }
}
