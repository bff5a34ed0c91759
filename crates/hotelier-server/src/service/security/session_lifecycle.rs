//! Session lifecycle over persisted token rows.
//!
//! Every user owns at most one token row. Login either creates that row,
//! hands back the still-valid stored token, or refreshes an expired one in
//! place. Refresh only ever happens after the caller has re-proven the
//! user's identity with credentials; a token alone never refreshes itself.

use hotelier_postgres::model::{NewSessionToken, User};
use hotelier_postgres::query::SessionTokenRepository;
use hotelier_postgres::PgConnection;

use crate::handler::{ErrorKind, Result};
use crate::service::security::token_signer::{SessionClaims, TokenError, TokenSigner};

const TRACING_TARGET: &str = "hotelier_server::service::session_lifecycle";

/// Outcome of inspecting a stored token during login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    /// The stored token is still valid; hand it back unchanged.
    KeepExisting,
    /// The stored token expired but the identity is live; sign a
    /// replacement bound to the same user.
    Reissue,
    /// The stored token expired and the identity cannot refresh it.
    RejectExpired,
    /// The stored token is not authentic. Terminal.
    RejectMalformed,
}

impl RefreshDecision {
    /// Classifies a decode outcome against the liveness of the identity
    /// presenting it.
    pub fn classify(
        decoded: &std::result::Result<SessionClaims, TokenError>,
        identity_live: bool,
    ) -> Self {
        match decoded {
            Ok(_) => Self::KeepExisting,
            Err(TokenError::Expired) if identity_live => Self::Reissue,
            Err(TokenError::Expired) => Self::RejectExpired,
            Err(TokenError::Malformed) => Self::RejectMalformed,
        }
    }
}

/// Returns a session token for a freshly authenticated user.
///
/// Looks up the user's stored token row. With no row, a new token is signed
/// and persisted. With a row, the stored token is decoded and the
/// [`RefreshDecision`] applied: still-valid tokens are returned as-is,
/// expired ones are re-signed and overwritten in place so the row keeps its
/// identity and user binding.
pub async fn issue_or_reuse(
    conn: &mut PgConnection,
    signer: &TokenSigner,
    user: &User,
) -> Result<String> {
    let Some(row) = conn.find_token_by_user_id(user.id).await? else {
        let (token, _claims) = signer.issue(user.id)?;
        let row = conn
            .upsert_token(NewSessionToken {
                user_id: user.id,
                token: token.clone(),
            })
            .await?;

        tracing::debug!(
            target: TRACING_TARGET,
            user_id = user.id,
            token_id = row.id,
            "issued new session token"
        );

        return Ok(token);
    };

    let decoded = signer.decode(&row.token);
    match RefreshDecision::classify(&decoded, user.can_login()) {
        RefreshDecision::KeepExisting => {
            // Binding check: a stored token signed for another user must
            // never be handed out, even if it verifies.
            if decoded.is_ok_and(|claims| claims.user_id != user.id) {
                tracing::warn!(
                    target: TRACING_TARGET,
                    user_id = user.id,
                    token_id = row.id,
                    "stored token bound to a different user"
                );
                return Err(ErrorKind::MalformedAuthToken
                    .with_message("token is invalid")
                    .into_static());
            }

            Ok(row.token)
        }
        RefreshDecision::Reissue => {
            let (token, _claims) = signer.issue(user.id)?;
            let refreshed = conn.replace_token(row.id, &token).await?;

            tracing::debug!(
                target: TRACING_TARGET,
                user_id = user.id,
                token_id = refreshed.id,
                "refreshed expired session token"
            );

            Ok(token)
        }
        RefreshDecision::RejectExpired => Err(ErrorKind::ExpiredAuthToken
            .with_message("token has expired")
            .into_static()),
        RefreshDecision::RejectMalformed => {
            tracing::warn!(
                target: TRACING_TARGET,
                user_id = user.id,
                token_id = row.id,
                "stored session token failed verification"
            );

            Err(ErrorKind::MalformedAuthToken
                .with_message("token is invalid")
                .into_static())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::SessionConfig;

    fn signer() -> TokenSigner {
        TokenSigner::new(&SessionConfig::new("0123456789abcdef0123456789abcdef"))
    }

    #[test]
    fn valid_token_is_kept() -> anyhow::Result<()> {
        let signer = signer();
        let (token, _) = signer.issue(7)?;

        let decision = RefreshDecision::classify(&signer.decode(&token), true);
        assert_eq!(decision, RefreshDecision::KeepExisting);

        Ok(())
    }

    #[test]
    fn expired_token_with_live_identity_is_reissued() -> anyhow::Result<()> {
        let signer = signer();
        let (token, _) = signer.issue_with_ttl(7, -60)?;

        let decision = RefreshDecision::classify(&signer.decode(&token), true);
        assert_eq!(decision, RefreshDecision::Reissue);

        Ok(())
    }

    #[test]
    fn expired_token_without_live_identity_is_rejected() -> anyhow::Result<()> {
        let signer = signer();
        let (token, _) = signer.issue_with_ttl(7, -60)?;

        let decision = RefreshDecision::classify(&signer.decode(&token), false);
        assert_eq!(decision, RefreshDecision::RejectExpired);

        Ok(())
    }

    #[test]
    fn malformed_token_is_rejected_regardless_of_identity() {
        let signer = signer();

        for identity_live in [true, false] {
            let decision =
                RefreshDecision::classify(&signer.decode("garbage"), identity_live);
            assert_eq!(decision, RefreshDecision::RejectMalformed);
        }
    }

    #[test]
    fn refresh_never_rescues_a_foreign_signature() -> anyhow::Result<()> {
        let signer = signer();
        let foreign = TokenSigner::new(&SessionConfig::new(
            "ffffffffffffffffffffffffffffffff",
        ));
        let (token, _) = foreign.issue_with_ttl(7, -60)?;

        let decision = RefreshDecision::classify(&signer.decode(&token), true);
        assert_eq!(decision, RefreshDecision::RejectMalformed);

        Ok(())
    }
}
