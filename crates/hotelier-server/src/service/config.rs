//! Session signing configuration.

use std::fmt;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Minimum accepted secret length in bytes.
const MIN_SECRET_LEN: usize = 32;

/// Bounds for the token time-to-live, in seconds.
const MIN_TTL_SECS: i64 = 60;
const MAX_TTL_SECS: i64 = 60 * 60 * 24 * 30;

/// Configuration for the JWT session codec.
///
/// Carries the symmetric signing secret and the default token lifetime.
/// There is no ambient global: the secret is handed to [`TokenSigner`] at
/// construction and lives only inside it.
///
/// [`TokenSigner`]: crate::service::TokenSigner
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct SessionConfig {
    /// Symmetric secret used to sign and verify session tokens.
    #[cfg_attr(feature = "config", arg(long = "session-secret", env = "SESSION_SECRET"))]
    pub session_secret: String,

    /// Default session token lifetime in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "session-ttl-secs",
            env = "SESSION_TTL_SECS",
            default_value = "3600"
        )
    )]
    pub session_ttl_secs: i64,
}

impl SessionConfig {
    /// Creates a new session configuration with the default token lifetime.
    pub fn new(session_secret: impl Into<String>) -> Self {
        Self {
            session_secret: session_secret.into(),
            session_ttl_secs: 3600,
        }
    }

    /// Sets the default token lifetime in seconds.
    pub fn with_ttl_secs(mut self, secs: i64) -> Self {
        self.session_ttl_secs = secs;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.session_secret.is_empty() {
            return Err(Error::config("session secret cannot be empty"));
        }

        if self.session_secret.len() < MIN_SECRET_LEN {
            return Err(Error::config(format!(
                "session secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        if !(MIN_TTL_SECS..=MAX_TTL_SECS).contains(&self.session_ttl_secs) {
            return Err(Error::config(format!(
                "session_ttl_secs must be between {} and {}",
                MIN_TTL_SECS, MAX_TTL_SECS
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("session_secret", &"***")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config() {
        let config = SessionConfig::new("0123456789abcdef0123456789abcdef");
        assert!(config.validate().is_ok());
        assert_eq!(config.session_ttl_secs, 3600);
    }

    #[test]
    fn rejects_short_secret() {
        let config = SessionConfig::new("too-short");
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_ttl() {
        let config = SessionConfig::new("0123456789abcdef0123456789abcdef").with_ttl_secs(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_masks_secret() {
        let config = SessionConfig::new("0123456789abcdef0123456789abcdef");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("0123456789abcdef"));
    }
}
