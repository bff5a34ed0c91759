//! Application state and dependency injection.

mod config;
mod security;

use hotelier_postgres::{PgClient, PgConfig, run_pending_migrations};

pub use crate::service::config::SessionConfig;
pub use crate::service::security::{
    PasswordHasher, RefreshDecision, SessionClaims, TokenError, TokenSigner, issue_or_reuse,
};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    // External services:
    pub postgres: PgClient,

    // Internal services:
    pub password_hasher: PasswordHasher,
    pub token_signer: TokenSigner,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to the database, applies pending migrations and constructs
    /// the internal services.
    pub async fn new(pg_config: PgConfig, session_config: SessionConfig) -> Result<Self> {
        session_config.validate()?;

        let postgres = pg_config.build()?;
        run_pending_migrations(&postgres).await?;

        let service_state = Self {
            postgres,
            password_hasher: PasswordHasher::new(),
            token_signer: TokenSigner::new(&session_config),
        };

        Ok(service_state)
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(postgres: PgClient);

// Internal services:
impl_di!(password_hasher: PasswordHasher);
impl_di!(token_signer: TokenSigner);
