//! Election catalog and vote ledger
//!
//! [`ElectionLedger`] owns every table a vote touches: elections, candidate
//! memberships, vote rows and tallies all live behind one `RwLock`, so
//! `cast_vote` is a single serializable critical section and
//! `delete_election` cascades in one atomic unit. The identity store and
//! voter registry keep their own locks; they are read-only inputs to vote
//! validation and their locks are never held while the state lock is taken.

use crate::ledger::{IdentityStore, VoterRegistry};
use crate::types::{BallotReceipt, Candidate, ElectionId, ElectionView, TallyRow, VoterProfile};
use crate::{Error, Result, storage_error};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use uuid::Uuid;

/// Typed rejection of a vote attempt.
///
/// These are normal outcomes of `cast_vote`, not errors: every rejection
/// leaves the ledger exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteRejection {
    /// No profile is registered for this voter id
    UnknownVoter { voter_id: String },

    /// The voter has a profile but no token in the identity store
    NotEligible { voter_id: String },

    /// A vote already exists for this (election, voter) pair
    DuplicateVote {
        election_id: ElectionId,
        voter_id: String,
    },

    /// The candidate is not part of this election
    CandidateNotInElection {
        election_id: ElectionId,
        candidate_id: String,
    },
}

impl std::fmt::Display for VoteRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVoter { voter_id } => {
                write!(f, "voter with id {voter_id} does not exist")
            }
            Self::NotEligible { voter_id } => {
                write!(f, "voter with id {voter_id} is not eligible to vote")
            }
            Self::DuplicateVote { voter_id, .. } => {
                write!(f, "voter {voter_id} has already cast a vote in this election")
            }
            Self::CandidateNotInElection { candidate_id, .. } => {
                write!(f, "candidate {candidate_id} is not part of this election")
            }
        }
    }
}

/// Outcome of a vote attempt: accepted with a receipt, or rejected with a
/// typed reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    Accepted(BallotReceipt),
    Rejected(VoteRejection),
}

impl VoteOutcome {
    /// Whether the vote was recorded
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The rejection reason, if any
    pub fn rejection(&self) -> Option<&VoteRejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Accepted(_) => None,
        }
    }
}

/// A recorded vote. Uniqueness is keyed on (election, voter); the UUID is a
/// surrogate key for receipts and audit.
#[derive(Debug, Clone)]
struct VoteRow {
    vote_id: Uuid,
    candidate_id: String,
    cast_at: DateTime<Utc>,
}

/// An election row with its candidate membership in insertion order.
#[derive(Debug, Clone)]
struct ElectionRow {
    name: String,
    candidate_ids: Vec<String>,
}

/// All state the ledger owns, guarded by one lock.
#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    /// Last assigned election id; the sequence starts at 1
    last_election_id: ElectionId,
    elections: BTreeMap<ElectionId, ElectionRow>,
    /// Global candidate table; membership lives on the election rows
    candidates: HashMap<String, Candidate>,
    /// Vote facts keyed by (election, voter)
    votes: HashMap<(ElectionId, String), VoteRow>,
    /// Derived counts keyed by (election, candidate), maintained alongside
    /// vote insertion in the same critical section
    tallies: HashMap<(ElectionId, String), u64>,
}

/// The transactional election ledger and its collaborators.
///
/// Exposes the full operation boundary: voter registration, identity
/// registration, catalog management, vote casting and (via
/// [`summarize`](ElectionLedger::summarize)) result projection.
#[derive(Debug, Default)]
pub struct ElectionLedger {
    identities: IdentityStore,
    registry: VoterRegistry,
    state: RwLock<LedgerState>,
}

impl ElectionLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a voter profile. Fails with `DuplicateVoter` on re-registration.
    pub fn register_voter(&self, profile: VoterProfile) -> Result<()> {
        self.registry.register_voter(profile)
    }

    /// Bulk-register eligibility tokens; duplicates are silently ignored.
    /// Returns the number of tokens newly added.
    pub fn register_identities<I, S>(&self, ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identities.register_identities(ids)
    }

    /// Membership test against the identity store.
    pub fn is_eligible(&self, voter_id: &str) -> Result<bool> {
        self.identities.is_eligible(voter_id)
    }

    /// Voter registry, for direct profile lookups
    pub fn registry(&self) -> &VoterRegistry {
        &self.registry
    }

    /// Create an election with an empty candidate set.
    ///
    /// Identifiers come from a monotonic sequence counter and are never
    /// reused. Never fails under valid input.
    pub fn create_election(&self, name: impl Into<String>) -> Result<ElectionId> {
        let name = name.into();
        let mut state = self.state_write()?;

        state.last_election_id += 1;
        let id = state.last_election_id;
        state.elections.insert(
            id,
            ElectionRow {
                name: name.clone(),
                candidate_ids: Vec::new(),
            },
        );

        tracing::info!(election_id = id, name = %name, "election created");
        Ok(id)
    }

    /// Add a candidate to an election's membership.
    ///
    /// Idempotent: re-adding a present candidate is a no-op, not an error.
    /// The candidate record is inserted into the global candidate table the
    /// first time it is seen; an existing record is left untouched.
    pub fn add_candidate_to_election(
        &self,
        election_id: ElectionId,
        candidate: Candidate,
    ) -> Result<()> {
        let mut guard = self.state_write()?;
        let state = &mut *guard;

        let Some(row) = state.elections.get_mut(&election_id) else {
            return Err(Error::ElectionNotFound { id: election_id });
        };

        state
            .candidates
            .entry(candidate.id.clone())
            .or_insert_with(|| candidate.clone());

        if !row.candidate_ids.contains(&candidate.id) {
            tracing::info!(election_id, candidate_id = %candidate.id, "candidate added");
            row.candidate_ids.push(candidate.id);
        }

        Ok(())
    }

    /// Fetch an election with its candidate set and current tallies.
    pub fn get_election(&self, election_id: ElectionId) -> Result<ElectionView> {
        let state = self.state_read()?;

        let row = state
            .elections
            .get(&election_id)
            .ok_or(Error::ElectionNotFound { id: election_id })?;

        let candidates = row
            .candidate_ids
            .iter()
            .filter_map(|id| state.candidates.get(id).cloned())
            .collect();

        let tallies = row
            .candidate_ids
            .iter()
            .filter_map(|id| {
                state
                    .tallies
                    .get(&(election_id, id.clone()))
                    .map(|votes| TallyRow {
                        candidate_id: id.clone(),
                        votes: *votes,
                    })
            })
            .collect();

        Ok(ElectionView {
            id: election_id,
            name: row.name.clone(),
            candidates,
            tallies,
        })
    }

    /// Delete an election and cascade to its dependent rows.
    ///
    /// Candidate memberships, tally rows and vote rows for the election are
    /// removed together with the election row inside one critical section;
    /// partial deletion is never observable. Global candidate records are
    /// kept (candidates are election-agnostic).
    pub fn delete_election(&self, election_id: ElectionId) -> Result<()> {
        let mut state = self.state_write()?;

        if state.elections.remove(&election_id).is_none() {
            return Err(Error::ElectionNotFound { id: election_id });
        }
        state.votes.retain(|(eid, _), _| *eid != election_id);
        state.tallies.retain(|(eid, _), _| *eid != election_id);

        tracing::info!(election_id, "election deleted");
        Ok(())
    }

    /// Atomically validate and record a single vote.
    ///
    /// Checks short-circuit in order: registered profile (`UnknownVoter`),
    /// identity-store membership (`NotEligible`), no prior vote for this
    /// (election, voter) pair (`DuplicateVote`), candidate membership
    /// (`CandidateNotInElection`). On success the vote row is inserted and
    /// the candidate's tally incremented in the same critical section, so a
    /// reader never observes one effect without the other. Rejections leave
    /// no partial write; the ledger itself never retries.
    ///
    /// Voting in an election that does not exist is a caller error, reported
    /// as `Err(ElectionNotFound)` rather than a rejection.
    pub fn cast_vote(
        &self,
        election_id: ElectionId,
        voter_id: &str,
        candidate_id: &str,
    ) -> Result<VoteOutcome> {
        // Registry and identity checks are independent of ledger state and
        // take no ledger lock. Both must pass.
        if !self.registry.contains(voter_id)? {
            tracing::warn!(election_id, voter_id, "vote rejected: unknown voter");
            return Ok(VoteOutcome::Rejected(VoteRejection::UnknownVoter {
                voter_id: voter_id.to_string(),
            }));
        }
        if !self.identities.is_eligible(voter_id)? {
            tracing::warn!(election_id, voter_id, "vote rejected: not eligible");
            return Ok(VoteOutcome::Rejected(VoteRejection::NotEligible {
                voter_id: voter_id.to_string(),
            }));
        }

        let mut state = self.state_write()?;

        if !state.elections.contains_key(&election_id) {
            return Err(Error::ElectionNotFound { id: election_id });
        }

        let vote_key = (election_id, voter_id.to_string());
        if state.votes.contains_key(&vote_key) {
            tracing::warn!(election_id, voter_id, "vote rejected: duplicate");
            return Ok(VoteOutcome::Rejected(VoteRejection::DuplicateVote {
                election_id,
                voter_id: voter_id.to_string(),
            }));
        }

        let member = state
            .elections
            .get(&election_id)
            .is_some_and(|row| row.candidate_ids.iter().any(|id| id == candidate_id));
        if !member {
            tracing::warn!(
                election_id,
                candidate_id,
                "vote rejected: candidate not in election"
            );
            return Ok(VoteOutcome::Rejected(VoteRejection::CandidateNotInElection {
                election_id,
                candidate_id: candidate_id.to_string(),
            }));
        }

        // Both effects commit under the same write guard or neither does.
        let row = VoteRow {
            vote_id: Uuid::new_v4(),
            candidate_id: candidate_id.to_string(),
            cast_at: Utc::now(),
        };
        let receipt = BallotReceipt {
            vote_id: row.vote_id,
            election_id,
            voter_id: voter_id.to_string(),
            candidate_id: row.candidate_id.clone(),
            cast_at: row.cast_at,
        };
        state.votes.insert(vote_key, row);
        *state
            .tallies
            .entry((election_id, candidate_id.to_string()))
            .or_insert(0) += 1;

        tracing::debug!(election_id, voter_id, candidate_id, "vote accepted");
        Ok(VoteOutcome::Accepted(receipt))
    }

    pub(crate) fn state_read(&self) -> Result<std::sync::RwLockReadGuard<'_, LedgerState>> {
        self.state
            .read()
            .map_err(|_| storage_error!("ledger state lock poisoned"))
    }

    fn state_write(&self) -> Result<std::sync::RwLockWriteGuard<'_, LedgerState>> {
        self.state
            .write()
            .map_err(|_| storage_error!("ledger state lock poisoned"))
    }
}

impl LedgerState {
    /// Candidate ids registered to an election, in insertion order.
    pub(crate) fn membership(&self, election_id: ElectionId) -> Option<&[String]> {
        self.elections
            .get(&election_id)
            .map(|row| row.candidate_ids.as_slice())
    }

    /// Election name, if the election exists.
    pub(crate) fn election_name(&self, election_id: ElectionId) -> Option<&str> {
        self.elections.get(&election_id).map(|row| row.name.as_str())
    }

    /// Tally for one (election, candidate) pair; absent row means zero.
    pub(crate) fn tally(&self, election_id: ElectionId, candidate_id: &str) -> u64 {
        self.tallies
            .get(&(election_id, candidate_id.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Candidate display name from the global table.
    pub(crate) fn candidate_name(&self, candidate_id: &str) -> Option<&str> {
        self.candidates.get(candidate_id).map(|c| c.name.as_str())
    }

    /// Number of vote rows for an election.
    pub(crate) fn vote_count(&self, election_id: ElectionId) -> u64 {
        self.votes.keys().filter(|(eid, _)| *eid == election_id).count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: format!("Candidate {id}"),
            manifesto: "A fair count for all".to_string(),
        }
    }

    fn profile(id: &str) -> VoterProfile {
        VoterProfile {
            id: id.to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            phone: "0800-001".to_string(),
        }
    }

    /// Ledger with one election, candidates A and B, and `voters` registered
    /// both as profiles and identities.
    fn seeded(voters: &[&str]) -> (ElectionLedger, ElectionId) {
        let ledger = ElectionLedger::new();
        let election = ledger.create_election("Council").unwrap();
        ledger
            .add_candidate_to_election(election, candidate("A"))
            .unwrap();
        ledger
            .add_candidate_to_election(election, candidate("B"))
            .unwrap();
        for voter in voters {
            ledger.register_voter(profile(voter)).unwrap();
        }
        ledger
            .register_identities(voters.iter().copied())
            .unwrap();
        (ledger, election)
    }

    #[test]
    fn test_election_ids_are_monotonic() {
        let ledger = ElectionLedger::new();

        let first = ledger.create_election("First").unwrap();
        let second = ledger.create_election("Second").unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);

        // Deletion does not free ids for reuse
        ledger.delete_election(second).unwrap();
        let third = ledger.create_election("Third").unwrap();
        assert_eq!(third, 3);
    }

    #[test]
    fn test_add_candidate_is_idempotent() {
        let (ledger, election) = seeded(&[]);

        ledger
            .add_candidate_to_election(election, candidate("A"))
            .unwrap();

        let view = ledger.get_election(election).unwrap();
        assert_eq!(view.candidates.len(), 2);
        assert_eq!(view.candidates[0].id, "A");
        assert_eq!(view.candidates[1].id, "B");
    }

    #[test]
    fn test_add_candidate_unknown_election() {
        let ledger = ElectionLedger::new();
        let err = ledger
            .add_candidate_to_election(99, candidate("A"))
            .unwrap_err();
        assert!(matches!(err, Error::ElectionNotFound { id: 99 }));
    }

    #[test]
    fn test_cast_vote_accepted() {
        let (ledger, election) = seeded(&["V1"]);

        let outcome = ledger.cast_vote(election, "V1", "A").unwrap();
        let VoteOutcome::Accepted(receipt) = outcome else {
            panic!("expected acceptance, got {outcome:?}");
        };
        assert_eq!(receipt.election_id, election);
        assert_eq!(receipt.candidate_id, "A");

        let view = ledger.get_election(election).unwrap();
        assert_eq!(view.tallies, vec![TallyRow {
            candidate_id: "A".to_string(),
            votes: 1,
        }]);
    }

    #[test]
    fn test_unknown_voter_rejected() {
        let (ledger, election) = seeded(&[]);

        let outcome = ledger.cast_vote(election, "ghost", "A").unwrap();
        assert_eq!(
            outcome.rejection(),
            Some(&VoteRejection::UnknownVoter {
                voter_id: "ghost".to_string()
            })
        );
    }

    #[test]
    fn test_profile_without_identity_rejected() {
        // Registration and eligibility are distinct checks; both must pass.
        let (ledger, election) = seeded(&[]);
        ledger.register_voter(profile("V1")).unwrap();

        let outcome = ledger.cast_vote(election, "V1", "A").unwrap();
        assert_eq!(
            outcome.rejection(),
            Some(&VoteRejection::NotEligible {
                voter_id: "V1".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_vote_rejected_and_tally_unaffected() {
        let (ledger, election) = seeded(&["V1"]);

        assert!(ledger.cast_vote(election, "V1", "A").unwrap().is_accepted());

        // Second attempt, even for a different candidate, is rejected
        let outcome = ledger.cast_vote(election, "V1", "B").unwrap();
        assert!(matches!(
            outcome.rejection(),
            Some(VoteRejection::DuplicateVote { .. })
        ));

        let view = ledger.get_election(election).unwrap();
        assert_eq!(view.tallies.len(), 1);
        assert_eq!(view.tallies[0].votes, 1);
    }

    #[test]
    fn test_non_member_candidate_rejected_without_residue() {
        let (ledger, election) = seeded(&["V1"]);

        let outcome = ledger.cast_vote(election, "V1", "Z").unwrap();
        assert!(matches!(
            outcome.rejection(),
            Some(VoteRejection::CandidateNotInElection { .. })
        ));

        // No vote row was written: the voter can still vote
        assert!(ledger.cast_vote(election, "V1", "A").unwrap().is_accepted());
    }

    #[test]
    fn test_vote_in_missing_election_is_an_error() {
        let (ledger, _) = seeded(&["V1"]);
        let err = ledger.cast_vote(404, "V1", "A").unwrap_err();
        assert!(matches!(err, Error::ElectionNotFound { id: 404 }));
    }

    #[test]
    fn test_delete_cascades_atomically() {
        let (ledger, election) = seeded(&["V1", "V2"]);
        ledger.cast_vote(election, "V1", "A").unwrap();
        ledger.cast_vote(election, "V2", "B").unwrap();

        ledger.delete_election(election).unwrap();

        assert!(matches!(
            ledger.get_election(election),
            Err(Error::ElectionNotFound { .. })
        ));

        // No orphan rows: a fresh election starts clean for the same voters
        let next = ledger.create_election("Council II").unwrap();
        ledger
            .add_candidate_to_election(next, candidate("A"))
            .unwrap();
        assert!(ledger.cast_vote(next, "V1", "A").unwrap().is_accepted());
    }

    #[test]
    fn test_delete_missing_election() {
        let ledger = ElectionLedger::new();
        assert!(matches!(
            ledger.delete_election(7),
            Err(Error::ElectionNotFound { id: 7 })
        ));
    }
}
