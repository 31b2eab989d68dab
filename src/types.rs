//! # Core Types for the Election Ledger
//!
//! Fundamental data structures shared across the ledger, catalog, registry
//! and result projector.
//!
//! ## Type Categories
//!
//! ### Identifiers
//! - [`ElectionId`]: system-assigned, monotonically increasing election key
//! - Voter and candidate identifiers are opaque strings supplied by callers
//!
//! ### Core Entities
//! - [`VoterProfile`]: registered voter record (distinct from eligibility)
//! - [`Candidate`]: election-agnostic candidate information
//! - [`ElectionView`]: an election with its candidate set and current tallies
//! - [`BallotReceipt`]: proof of an accepted vote
//!
//! ### Read Models
//! - [`ResultSummary`]: ranked, percentage-annotated election results
//! - [`CandidateResult`]: one candidate's entry within a summary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Election identifier, assigned by the catalog from a sequence counter.
///
/// Identifiers start at 1 and increase monotonically; they are never reused,
/// even after an election is deleted.
pub type ElectionId = i64;

/// A registered voter's profile record.
///
/// Registration is distinct from eligibility: a profile may exist without a
/// matching token in the identity store, and vice versa. Both are required
/// for a vote to be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterProfile {
    /// Opaque voter identifier (e.g. a national ID number)
    #[serde(rename = "ID")]
    pub id: String,

    /// Voter's first name
    #[serde(rename = "firstname")]
    pub first_name: String,

    /// Voter's last name
    #[serde(rename = "lastname")]
    pub last_name: String,

    /// Contact phone number
    #[serde(rename = "phoneNo")]
    pub phone: String,
}

/// Candidate information, independent of any particular election.
///
/// Candidates are associated to elections through a membership relation
/// owned by the catalog; the same candidate may stand in several elections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Globally unique candidate identifier
    pub id: String,

    /// Candidate's display name
    pub name: String,

    /// Candidate's manifesto text
    pub manifesto: String,
}

/// Per-candidate vote count within one election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyRow {
    /// Candidate the count belongs to
    #[serde(rename = "candidateId")]
    pub candidate_id: String,

    /// Number of accepted votes; equals the number of vote rows for this
    /// (election, candidate) pair at any quiescent point
    pub votes: u64,
}

/// An election with its candidate set and current tallies.
///
/// Returned by `get_election`. Candidates appear in insertion order;
/// tallies contain one row per candidate that has received at least one vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionView {
    /// Election identifier
    pub id: ElectionId,

    /// Human-readable election name
    pub name: String,

    /// Candidates registered to this election, in insertion order
    pub candidates: Vec<Candidate>,

    /// Current tallies, one row per candidate with votes
    pub tallies: Vec<TallyRow>,
}

/// Receipt for an accepted vote.
///
/// The `vote_id` is a UUID surrogate key for the vote row; the uniqueness
/// of the vote itself is keyed on (election, voter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotReceipt {
    /// Surrogate key of the recorded vote
    pub vote_id: Uuid,

    /// Election the vote was cast in
    pub election_id: ElectionId,

    /// Voter who cast the vote
    pub voter_id: String,

    /// Candidate the vote was cast for
    pub candidate_id: String,

    /// When the vote was recorded
    pub cast_at: DateTime<Utc>,
}

/// One candidate's entry in a [`ResultSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateResult {
    /// Candidate identifier
    #[serde(rename = "candidateId")]
    pub candidate_id: String,

    /// Candidate display name
    #[serde(rename = "candidateName")]
    pub candidate_name: String,

    /// Accepted votes for this candidate
    #[serde(rename = "voteCount")]
    pub vote_count: u64,

    /// Share of the total vote, rendered to two decimal places
    /// (e.g. `"45.83%"`), or the literal `"0%"` when the election has no
    /// votes at all
    pub percentage: String,
}

/// Ranked, percentage-annotated results for one election.
///
/// Entries are sorted by vote count descending; candidates tied on votes
/// keep their insertion order within the election. Candidates with zero
/// votes are always included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// Election identifier
    #[serde(rename = "electionId")]
    pub election_id: ElectionId,

    /// Election name
    #[serde(rename = "electionName")]
    pub election_name: String,

    /// Total accepted votes across all candidates
    #[serde(rename = "totalVotes")]
    pub total_votes: u64,

    /// Per-candidate results, best first
    pub results: Vec<CandidateResult>,
}

/// Render a candidate's share of the vote.
///
/// Two decimal places over the total, or `"0%"` when `total_votes` is zero
/// so the computation never divides by zero.
pub fn render_percentage(vote_count: u64, total_votes: u64) -> String {
    if total_votes == 0 {
        "0%".to_string()
    } else {
        format!("{:.2}%", (vote_count as f64 / total_votes as f64) * 100.0)
    }
}
