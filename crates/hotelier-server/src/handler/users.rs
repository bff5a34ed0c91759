//! User management handlers.
//!
//! All routes require authentication; everything except the single-user
//! lookup additionally requires the administrator role. Create and update
//! run the ordered validation pipeline with a prefetched username
//! uniqueness flag; the unique index backstops the prefetch against races.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use hotelier_postgres::model::{NewUser, UpdateUser};
use hotelier_postgres::query::UserRepository;
use hotelier_postgres::{PgClient, ScopedFutureExt};
use serde::{Deserialize, Serialize};

use crate::extract::CurrentUser;
use crate::handler::response::UserResponse;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{PasswordHasher, ServiceState};
use crate::validate::{CreateUserInput, UpdateUserInput};

const TRACING_TARGET: &str = "hotelier_server::handler::users";

/// Request payload for creating a user.
///
/// Every field is optional at the wire level so that a missing field
/// reaches the validation pipeline and reports its own message instead of
/// failing deserialization.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CreateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub patronymic: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub registration_address: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Request payload for partially updating a user.
///
/// Absent fields are left untouched.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub patronymic: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub registration_address: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// `GET /users`
///
/// Lists users holding the regular role, ordered by username. Admin only.
async fn list_users(
    State(postgres): State<PgClient>,
    current_user: CurrentUser,
) -> Result<Json<Vec<UserResponse>>> {
    current_user.authorize_admin()?;

    let mut conn = postgres.get_connection().await?;
    let users = conn.list_users().await?;

    if users.is_empty() {
        return Err(ErrorKind::NotFound
            .with_message("users list is empty")
            .with_resource("users")
            .into_static());
    }

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// `POST /users`
///
/// Creates a user after the full validation pipeline passes. Admin only.
async fn create_user(
    State(postgres): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    current_user: CurrentUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    current_user.authorize_admin()?;

    let mut conn = postgres.get_connection().await?;

    let username_taken = match request.username.as_deref().filter(|u| !u.is_empty()) {
        Some(username) => conn.username_exists(username).await?,
        None => false,
    };

    let valid = CreateUserInput {
        username: request.username.as_deref(),
        password: request.password.as_deref(),
        confirm_password: request.confirm_password.as_deref(),
        name: request.name.as_deref(),
        surname: request.surname.as_deref(),
        patronymic: request.patronymic.as_deref(),
        date_of_birth: request.date_of_birth.as_deref(),
        phone_number: request.phone_number.as_deref(),
        registration_address: request.registration_address.as_deref(),
        gender: request.gender.as_deref(),
        role: request.role.as_deref(),
        username_taken,
    }
    .validate()?;

    let hashed_password = password_hasher.hash_password(&valid.password)?;
    let new_user = NewUser {
        name: valid.name,
        surname: valid.surname,
        patronymic: valid.patronymic,
        username: valid.username,
        hashed_password,
        date_of_birth: valid.date_of_birth.into(),
        phone_number: valid.phone_number,
        registration_address: valid.registration_address,
        gender: valid.gender,
        role: valid.role,
    };

    let user = conn.create_user(new_user).await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = user.id,
        created_by = current_user.id,
        "user created"
    );

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `GET /users/{id}`
///
/// Returns a single user. Any authenticated user may look up any profile.
async fn get_user(
    State(postgres): State<PgClient>,
    _current_user: CurrentUser,
    Path(user_id): Path<i32>,
) -> Result<Json<UserResponse>> {
    let mut conn = postgres.get_connection().await?;

    let user = conn.find_user_by_id(user_id).await?.ok_or_else(|| {
        ErrorKind::NotFound
            .with_message("user not found")
            .with_resource("users")
    })?;

    Ok(Json(user.into()))
}

/// `PATCH /users/{id}`
///
/// Applies a partial update after validating the present fields. Admin only.
async fn update_user(
    State(postgres): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    current_user: CurrentUser,
    Path(user_id): Path<i32>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    current_user.authorize_admin()?;

    let mut conn = postgres.get_connection().await?;

    let request = &request;
    let password_hasher = &password_hasher;

    // The lookup, the uniqueness prefetch, and the write share one
    // transaction; the unique index still backstops concurrent inserts.
    let updated = conn
        .transaction(|conn| {
            async move {
                let user = conn.find_user_by_id(user_id).await?.ok_or_else(|| {
                    ErrorKind::NotFound
                        .with_message("user not found")
                        .with_resource("users")
                })?;

                let username_taken = match request.username.as_deref() {
                    Some(username) if username != user.username => {
                        conn.username_exists(username).await?
                    }
                    _ => false,
                };

                let valid = UpdateUserInput {
                    current_username: &user.username,
                    username_taken,
                    username: request.username.as_deref(),
                    password: request.password.as_deref(),
                    name: request.name.as_deref(),
                    surname: request.surname.as_deref(),
                    patronymic: request.patronymic.as_deref(),
                    date_of_birth: request.date_of_birth.as_deref(),
                    phone_number: request.phone_number.as_deref(),
                    registration_address: request.registration_address.as_deref(),
                    gender: request.gender.as_deref(),
                    role: request.role.as_deref(),
                }
                .validate()?;

                let hashed_password = match valid.password {
                    Some(ref password) => Some(password_hasher.hash_password(password)?),
                    None => None,
                };

                let updates = UpdateUser {
                    name: valid.name,
                    surname: valid.surname,
                    patronymic: valid.patronymic,
                    username: valid.username,
                    hashed_password,
                    date_of_birth: valid.date_of_birth.map(Into::into),
                    phone_number: valid.phone_number,
                    registration_address: valid.registration_address,
                    gender: valid.gender,
                    role: valid.role,
                    is_banned: None,
                };

                // An update naming no columns would be a malformed diesel
                // statement.
                if updates.is_empty() {
                    return Ok(user);
                }

                let updated = conn.update_user(user_id, updates).await?;
                Ok::<_, Error>(updated)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = updated.id,
        updated_by = current_user.id,
        "user updated"
    );

    Ok(Json(updated.into()))
}

/// `DELETE /users/{id}`
///
/// Deletes a user; the session row goes with it via the foreign key.
/// Admin only.
async fn delete_user(
    State(postgres): State<PgClient>,
    current_user: CurrentUser,
    Path(user_id): Path<i32>,
) -> Result<StatusCode> {
    current_user.authorize_admin()?;

    let mut conn = postgres.get_connection().await?;

    if !conn.delete_user(user_id).await? {
        return Err(ErrorKind::NotFound
            .with_message("user not found")
            .with_resource("users")
            .into_static());
    }

    tracing::info!(
        target: TRACING_TARGET,
        user_id,
        deleted_by = current_user.id,
        "user deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Returns a [`Router`] with all user management routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_tolerates_missing_fields() -> anyhow::Result<()> {
        let request: CreateUserRequest = serde_json::from_str(r#"{"username":"ivanov1"}"#)?;
        assert_eq!(request.username.as_deref(), Some("ivanov1"));
        assert!(request.password.is_none());
        assert!(request.role.is_none());
        Ok(())
    }

    #[test]
    fn update_request_distinguishes_absent_from_empty() -> anyhow::Result<()> {
        let request: UpdateUserRequest = serde_json::from_str(r#"{"patronymic":""}"#)?;
        assert_eq!(request.patronymic.as_deref(), Some(""));
        assert!(request.name.is_none());
        Ok(())
    }
}
