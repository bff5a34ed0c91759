//! Authenticated user extractor backed by the session store.
//!
//! A bearer token alone is not enough: the presented token must decode, match
//! the single stored token row for its user, and resolve to a user that is
//! still allowed to log in. Logout deletes the row, which invalidates every
//! copy of the token immediately regardless of its embedded expiry.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use derive_more::Deref;
use hotelier_postgres::PgClient;
use hotelier_postgres::model::User;
use hotelier_postgres::query::{SessionTokenRepository, UserRepository};

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{TokenError, TokenSigner};

/// The authenticated user resolved from the `Authorization` header.
///
/// Extraction succeeds only for a presented token that is authentic, not
/// expired, identical to the stored session token for its user, and bound to
/// a user who can still log in. The verified result is cached in request
/// extensions so later extractors in the same request reuse it.
#[derive(Debug, Clone, Deref)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Consumes the extractor, returning the inner [`User`].
    #[inline]
    pub fn into_inner(self) -> User {
        self.0
    }

    async fn resolve(token: &str, signer: &TokenSigner, postgres: &PgClient) -> Result<Self> {
        let claims = signer.decode(token).map_err(|token_error| {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %token_error,
                "presented token failed to decode"
            );

            match token_error {
                TokenError::Malformed => {
                    ErrorKind::MalformedAuthToken.with_message("token is invalid")
                }
                // A bearer presentation never refreshes; only a credential
                // login can replace an expired token.
                TokenError::Expired => {
                    ErrorKind::ExpiredAuthToken.with_message("token has expired")
                }
            }
        })?;

        let mut conn = postgres.get_connection().await?;

        let stored = conn
            .find_token_by_user_id(claims.user_id)
            .await?
            .ok_or_else(|| {
                tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    user_id = claims.user_id,
                    "no stored session for presented token"
                );
                ErrorKind::MalformedAuthToken.with_message("token is invalid")
            })?;

        // Logout or refresh replaced the stored token; stale copies die here.
        if stored.token != token {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                user_id = claims.user_id,
                "presented token does not match stored session"
            );
            return Err(ErrorKind::MalformedAuthToken
                .with_message("token is invalid")
                .into_static());
        }

        let user = conn
            .find_user_by_id(claims.user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    user_id = claims.user_id,
                    "session refers to a user that no longer exists"
                );
                ErrorKind::MalformedAuthToken.with_message("token is invalid")
            })?;

        if !user.can_login() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                user_id = user.id,
                "banned user presented a valid session token"
            );
            return Err(ErrorKind::Forbidden.into_error());
        }

        Ok(Self(user))
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Sync + Send + 'static,
    PgClient: FromRef<S>,
    TokenSigner: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Cached by an earlier extractor in the same request.
        if let Some(current_user) = parts.extensions.get::<Self>() {
            return Ok(current_user.clone());
        }

        type BearerHeader = TypedHeader<Authorization<Bearer>>;
        let bearer =
            <BearerHeader as OptionalFromRequestParts<S>>::from_request_parts(parts, state)
                .await
                .ok()
                .flatten()
                .ok_or_else(|| ErrorKind::MissingAuthToken.into_error())?;

        let signer = TokenSigner::from_ref(state);
        let postgres = PgClient::from_ref(state);
        let current_user = Self::resolve(bearer.token(), &signer, &postgres).await?;

        parts.extensions.insert(current_user.clone());
        Ok(current_user)
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Sync + Send + 'static,
    PgClient: FromRef<S>,
    TokenSigner: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <Self as FromRequestParts<S>>::from_request_parts(parts, state).await {
            Ok(current_user) => Ok(Some(current_user)),
            Err(_) => Ok(None),
        }
    }
}
