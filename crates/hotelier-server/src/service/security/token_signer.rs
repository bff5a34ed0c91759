//! Session token signing and decoding.
//!
//! Tokens are signed JWTs over a symmetric secret. Decoding deliberately
//! disables the library expiry check and compares the `exp` claim against the
//! current time itself, so that an expired-but-authentic token is reported as
//! [`TokenError::Expired`] rather than collapsing into the malformed case.
//! The session lifecycle relies on that distinction to decide between
//! refreshing a token and rejecting it outright.

use std::sync::Arc;

use jiff::Timestamp;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::handler::{ErrorKind, Result};
use crate::service::SessionConfig;

const TRACING_TARGET: &str = "hotelier_server::service::token_signer";

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Identifier of the user the token is bound to.
    #[serde(rename = "sub")]
    pub user_id: i32,
    /// Expiry as seconds since the Unix epoch.
    #[serde(rename = "exp")]
    pub expires_at: i64,
    /// Random nonce making every issued token unique.
    #[serde(rename = "jti")]
    pub nonce: Uuid,
}

impl SessionClaims {
    /// Returns `true` once the expiry instant has passed.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now().as_second()
    }
}

/// Why a presented token failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token is not an authentic signed token. Terminal.
    #[error("token is invalid")]
    Malformed,
    /// The token is authentic but its expiry has passed. Refreshable.
    #[error("token has expired")]
    Expired,
}

#[derive(Debug)]
struct SignerInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl_secs: i64,
}

/// Issues and decodes session tokens.
///
/// Cheap to clone; the keys live behind an [`Arc`].
#[derive(Debug, Clone)]
pub struct TokenSigner {
    inner: Arc<SignerInner>,
}

impl TokenSigner {
    /// Creates a signer from the session configuration.
    pub fn new(config: &SessionConfig) -> Self {
        let secret = config.session_secret.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked manually so Expired stays distinct from Malformed.
        // Presence of sub and jti is enforced by the typed claims struct.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        let inner = SignerInner {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            default_ttl_secs: config.session_ttl_secs,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Issues a fresh token for the given user with the default lifetime.
    pub fn issue(&self, user_id: i32) -> Result<(String, SessionClaims)> {
        self.issue_with_ttl(user_id, self.inner.default_ttl_secs)
    }

    /// Issues a fresh token expiring `ttl_secs` from now.
    pub fn issue_with_ttl(&self, user_id: i32, ttl_secs: i64) -> Result<(String, SessionClaims)> {
        let claims = SessionClaims {
            user_id,
            expires_at: Timestamp::now().as_second() + ttl_secs,
            nonce: Uuid::new_v4(),
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.inner.encoding_key)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "failed to sign session token"
                );

                ErrorKind::InternalServerError
                    .with_context("token signing error")
                    .with_resource("authentication")
            })?;

        Ok((token, claims))
    }

    /// Decodes and verifies a presented token.
    ///
    /// Signature, structure and claim checks run first; only an authentic
    /// token can come back as [`TokenError::Expired`].
    pub fn decode(&self, token: &str) -> std::result::Result<SessionClaims, TokenError> {
        let data = jsonwebtoken::decode::<SessionClaims>(
            token,
            &self.inner.decoding_key,
            &self.inner.validation,
        )
        .map_err(|e| {
            match e.kind() {
                // Signature and structural failures are all terminal.
                JwtErrorKind::InvalidSignature
                | JwtErrorKind::InvalidToken
                | JwtErrorKind::InvalidAlgorithm => {}
                other => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        kind = ?other,
                        "session token rejected"
                    );
                }
            }
            TokenError::Malformed
        })?;

        if data.claims.is_expired() {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        let config = SessionConfig::new("0123456789abcdef0123456789abcdef");
        TokenSigner::new(&config)
    }

    #[test]
    fn issue_and_decode_round_trip() -> anyhow::Result<()> {
        let signer = signer();
        let (token, claims) = signer.issue(42)?;

        let decoded = signer.decode(&token).expect("fresh token must decode");
        assert_eq!(decoded, claims);
        assert_eq!(decoded.user_id, 42);
        assert!(!decoded.is_expired());

        Ok(())
    }

    #[test]
    fn expired_token_is_reported_as_expired() -> anyhow::Result<()> {
        let signer = signer();
        let (token, _) = signer.issue_with_ttl(42, -60)?;

        assert_eq!(signer.decode(&token), Err(TokenError::Expired));

        Ok(())
    }

    #[test]
    fn garbage_token_is_malformed() {
        let signer = signer();
        assert_eq!(signer.decode("not.a.token"), Err(TokenError::Malformed));
        assert_eq!(signer.decode(""), Err(TokenError::Malformed));
    }

    #[test]
    fn foreign_signature_is_malformed_even_when_expired() -> anyhow::Result<()> {
        let signer = signer();
        let foreign = TokenSigner::new(&SessionConfig::new(
            "ffffffffffffffffffffffffffffffff",
        ));
        let (token, _) = foreign.issue_with_ttl(42, -60)?;

        // Signature check wins over the expiry check.
        assert_eq!(signer.decode(&token), Err(TokenError::Malformed));

        Ok(())
    }

    #[test]
    fn issued_tokens_are_unique() -> anyhow::Result<()> {
        let signer = signer();
        let (token1, claims1) = signer.issue(42)?;
        let (token2, claims2) = signer.issue(42)?;

        assert_ne!(token1, token2);
        assert_ne!(claims1.nonce, claims2.nonce);

        Ok(())
    }
}
