//! Election Ledger
//!
//! Records votes cast by registered voters and produces tallied,
//! percentage-weighted results. The ledger validates voter eligibility and
//! candidate membership, enforces at-most-one-vote-per-voter-per-election
//! under concurrent writes, and keeps per-candidate tallies consistent with
//! the recorded votes by construction.

pub mod config;
pub mod errors;
pub mod ledger;
pub mod request;
pub mod types;

// Re-export commonly used types
pub use errors::{Error, Result};
pub use ledger::{ElectionLedger, VoteOutcome, VoteRejection};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the election ledger with proper logging
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ballot=info".into()),
        )
        .init();

    tracing::info!("🗳️  Election ledger v{} initialized", VERSION);
    Ok(())
}
