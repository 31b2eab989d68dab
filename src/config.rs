//! Configuration management for the election ledger
//!
//! Loads the administrative secret and logging settings from environment
//! variables with validation. The secret is an injected capability compared
//! in constant time; it is never a global and never appears in debug output.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// Process-wide administrative secret for privileged catalog actions.
///
/// Creating or ending an election requires the caller to present a secret
/// that matches this one. Comparison is constant time over the secret bytes
/// to avoid leaking prefix information through timing.
#[derive(Clone)]
pub struct AdminSecret(String);

impl AdminSecret {
    /// Wrap a secret value; empty secrets are rejected.
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(Error::config("administrative secret must not be empty"));
        }
        Ok(Self(secret))
    }

    /// Check a presented secret against the configured one.
    ///
    /// Length differences short-circuit; equal-length comparison is
    /// constant time.
    pub fn verify(&self, presented: &str) -> bool {
        let ours = self.0.as_bytes();
        let theirs = presented.as_bytes();
        if ours.len() != theirs.len() {
            return false;
        }
        ours.ct_eq(theirs).into()
    }
}

impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminSecret(***)")
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub admin: AdminSecret,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// `BALLOT_ADMIN_SECRET` is required; `LOG_LEVEL` and `LOG_FORMAT`
    /// default to `info` and `pretty`. A `.env` file is honored if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let secret = std::env::var("BALLOT_ADMIN_SECRET")
            .map_err(|_| Error::config("BALLOT_ADMIN_SECRET environment variable required"))?;
        let admin = AdminSecret::new(secret)?;

        let logging = LoggingConfig {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
        };

        Ok(Self { admin, logging })
    }

    /// Create configuration for testing with a throwaway random secret.
    pub fn for_testing() -> Self {
        let admin = AdminSecret::new(uuid::Uuid::new_v4().to_string())
            .expect("generated secret is non-empty");

        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        };

        Self { admin, logging }
    }
}
