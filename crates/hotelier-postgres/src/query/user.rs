//! User repository for managing user principals.

use std::future::Future;

use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{NewUser, UpdateUser, User};
use crate::types::UserRole;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for user database operations.
///
/// Handles the user lifecycle: creation through the validation pipeline,
/// point lookups for authentication and session resolution, partial updates,
/// and removal by id.
pub trait UserRepository {
    /// Creates a new user principal.
    ///
    /// The caller is responsible for having validated the fields and hashed
    /// the password; this method only persists.
    fn create_user(&mut self, new_user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by its unique identifier.
    fn find_user_by_id(
        &mut self,
        user_id: i32,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by username.
    ///
    /// The comparison is a case-sensitive exact match.
    fn find_user_by_username(
        &mut self,
        username: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Checks whether a username is already registered.
    ///
    /// Used by the validation pipeline to reject duplicate usernames before
    /// an insert is attempted.
    fn username_exists(&mut self, username: &str) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists all users holding the regular `user` role, ordered by username.
    fn list_users(&mut self) -> impl Future<Output = PgResult<Vec<User>>> + Send;

    /// Applies a partial update to an existing user.
    ///
    /// Only fields set to `Some(value)` in the changeset are written.
    fn update_user(
        &mut self,
        user_id: i32,
        updates: UpdateUser,
    ) -> impl Future<Output = PgResult<User>> + Send;

    /// Deletes a user by id.
    ///
    /// Returns `false` if no user with the given id existed.
    fn delete_user(&mut self, user_id: i32) -> impl Future<Output = PgResult<bool>> + Send;
}

impl UserRepository for PgConnection {
    async fn create_user(&mut self, new_user: NewUser) -> PgResult<User> {
        use schema::users;

        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_user_by_id(&mut self, user_id: i32) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::id.eq(user_id))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_user_by_username(&mut self, username: &str) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::username.eq(username))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn username_exists(&mut self, username: &str) -> PgResult<bool> {
        use schema::users::{self, dsl};

        diesel::select(exists(
            users::table.filter(dsl::username.eq(username)),
        ))
        .get_result(self)
        .await
        .map_err(PgError::from)
    }

    async fn list_users(&mut self) -> PgResult<Vec<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::role.eq(UserRole::User))
            .order(dsl::username.asc())
            .select(User::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_user(&mut self, user_id: i32, updates: UpdateUser) -> PgResult<User> {
        use schema::users::{self, dsl};

        diesel::update(users::table.filter(dsl::id.eq(user_id)))
            .set(&updates)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_user(&mut self, user_id: i32) -> PgResult<bool> {
        use schema::users::{self, dsl};

        let deleted = diesel::delete(users::table.filter(dsl::id.eq(user_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }
}
