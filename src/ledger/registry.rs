//! Voter registry: profile records keyed by voter identity
//!
//! Registration and eligibility are distinct steps; a profile may exist here
//! without a matching token in the identity store. Profiles are immutable
//! once registered.

use crate::types::VoterProfile;
use crate::{Error, Result, storage_error};
use std::collections::HashMap;
use std::sync::RwLock;

/// Registered voter profiles, keyed by voter id.
#[derive(Debug, Default)]
pub struct VoterRegistry {
    profiles: RwLock<HashMap<String, VoterProfile>>,
}

impl VoterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a voter profile.
    ///
    /// Fails with [`Error::DuplicateVoter`] if a profile with the same id
    /// already exists; the existing record is left untouched.
    pub fn register_voter(&self, profile: VoterProfile) -> Result<()> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| storage_error!("voter registry lock poisoned"))?;

        if profiles.contains_key(&profile.id) {
            return Err(Error::duplicate_voter(&profile.id));
        }

        tracing::info!(voter_id = %profile.id, "registered voter");
        profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    /// Look up a voter profile by id.
    pub fn get_voter(&self, voter_id: &str) -> Result<Option<VoterProfile>> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| storage_error!("voter registry lock poisoned"))?;

        Ok(profiles.get(voter_id).cloned())
    }

    /// Whether a profile exists for this voter id.
    pub fn contains(&self, voter_id: &str) -> Result<bool> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| storage_error!("voter registry lock poisoned"))?;

        Ok(profiles.contains_key(voter_id))
    }
}
