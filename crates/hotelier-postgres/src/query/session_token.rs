//! Session token repository for managing persisted login sessions.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{NewSessionToken, SessionToken};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for session token database operations.
///
/// Each user owns at most one token row. Login reuses or overwrites that row,
/// and logout deletes it; the row id is stable across refreshes.
pub trait SessionTokenRepository {
    /// Finds the session token row for a user, if any.
    fn find_token_by_user_id(
        &mut self,
        user_id: i32,
    ) -> impl Future<Output = PgResult<Option<SessionToken>>> + Send;

    /// Inserts a token row for a user, overwriting the token in place if a
    /// row for that user already exists.
    ///
    /// The uniqueness constraint on `user_id` makes this safe against
    /// concurrent logins for the same user.
    fn upsert_token(
        &mut self,
        new_token: NewSessionToken,
    ) -> impl Future<Output = PgResult<SessionToken>> + Send;

    /// Overwrites the token string of an existing row.
    ///
    /// Used on refresh: the row keeps its identity, only the signed token
    /// string and `updated_at` change.
    fn replace_token(
        &mut self,
        token_id: i32,
        token: &str,
    ) -> impl Future<Output = PgResult<SessionToken>> + Send;

    /// Deletes the token row for a user.
    ///
    /// Returns `false` if the user had no active session.
    fn delete_token_by_user_id(
        &mut self,
        user_id: i32,
    ) -> impl Future<Output = PgResult<bool>> + Send;
}

impl SessionTokenRepository for PgConnection {
    async fn find_token_by_user_id(&mut self, user_id: i32) -> PgResult<Option<SessionToken>> {
        use schema::session_tokens::{self, dsl};

        session_tokens::table
            .filter(dsl::user_id.eq(user_id))
            .select(SessionToken::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn upsert_token(&mut self, new_token: NewSessionToken) -> PgResult<SessionToken> {
        use schema::session_tokens::{self, dsl};

        diesel::insert_into(session_tokens::table)
            .values(&new_token)
            .on_conflict(dsl::user_id)
            .do_update()
            .set(dsl::token.eq(&new_token.token))
            .returning(SessionToken::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn replace_token(&mut self, token_id: i32, token: &str) -> PgResult<SessionToken> {
        use schema::session_tokens::{self, dsl};

        diesel::update(session_tokens::table.filter(dsl::id.eq(token_id)))
            .set(dsl::token.eq(token))
            .returning(SessionToken::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_token_by_user_id(&mut self, user_id: i32) -> PgResult<bool> {
        use schema::session_tokens::{self, dsl};

        let deleted = diesel::delete(session_tokens::table.filter(dsl::user_id.eq(user_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }
}
