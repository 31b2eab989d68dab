//! Identity store: the set of voter identity tokens authorized to vote
//!
//! Eligibility is system-wide and independent of any particular election,
//! and distinct from having a registered profile (that is the registry's
//! concern). Tokens are set-membership only; they carry no payload and are
//! never mutated or removed in normal operation.

use crate::{Result, storage_error};
use std::collections::HashSet;
use std::sync::RwLock;

/// Set of voter identity tokens registered as eligible to vote.
#[derive(Debug, Default)]
pub struct IdentityStore {
    tokens: RwLock<HashSet<String>>,
}

impl IdentityStore {
    /// Create an empty identity store
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-register eligibility tokens.
    ///
    /// Idempotent: tokens already present are silently ignored, so calling
    /// this twice with overlapping sets leaves the same store content as one
    /// call with the union. Returns the number of tokens newly added.
    pub fn register_identities<I, S>(&self, ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| storage_error!("identity store lock poisoned"))?;

        let before = tokens.len();
        for id in ids {
            tokens.insert(id.into());
        }
        let added = tokens.len() - before;

        tracing::info!(added, total = tokens.len(), "registered voter identities");
        Ok(added)
    }

    /// Membership test against the eligibility set.
    pub fn is_eligible(&self, voter_id: &str) -> Result<bool> {
        let tokens = self
            .tokens
            .read()
            .map_err(|_| storage_error!("identity store lock poisoned"))?;

        Ok(tokens.contains(voter_id))
    }

    /// Number of registered identity tokens
    pub fn len(&self) -> Result<usize> {
        let tokens = self
            .tokens
            .read()
            .map_err(|_| storage_error!("identity store lock poisoned"))?;

        Ok(tokens.len())
    }

    /// Whether no identities have been registered
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
