//! Result projection: ranked, percentage-annotated summaries
//!
//! Reads the ledger's tallies and derives point-in-time [`ResultSummary`]
//! views. Projection is left-outer over the election's candidate membership:
//! candidates with no tally row appear with zero votes. Entries sort by vote
//! count descending; ties keep candidate insertion order (stable sort over
//! the membership list).

use crate::ledger::ElectionLedger;
use crate::types::{CandidateResult, ElectionId, ResultSummary, render_percentage};
use crate::{Error, Result};

impl ElectionLedger {
    /// Produce the full ranked summary for an election.
    ///
    /// Fails with [`Error::ElectionNotFound`] if the election does not
    /// exist. `total_votes` equals the number of vote rows for the election,
    /// which the ledger keeps equal to the sum of its tallies.
    pub fn summarize(&self, election_id: ElectionId) -> Result<ResultSummary> {
        let state = self.state_read()?;

        let membership = state
            .membership(election_id)
            .ok_or(Error::ElectionNotFound { id: election_id })?;
        let election_name = state
            .election_name(election_id)
            .unwrap_or_default()
            .to_string();

        let total_votes = state.vote_count(election_id);

        let mut results: Vec<CandidateResult> = membership
            .iter()
            .map(|candidate_id| CandidateResult {
                candidate_id: candidate_id.clone(),
                candidate_name: state
                    .candidate_name(candidate_id)
                    .unwrap_or_default()
                    .to_string(),
                vote_count: state.tally(election_id, candidate_id),
                percentage: render_percentage(state.tally(election_id, candidate_id), total_votes),
            })
            .collect();
        results.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));

        Ok(ResultSummary {
            election_id,
            election_name,
            total_votes,
            results,
        })
    }

    /// Produce the summary entry for one candidate.
    ///
    /// Same computation as [`summarize`](Self::summarize), filtered to the
    /// requested candidate. A candidate that is not a member of the election
    /// yields a zero-vote entry rather than an error, matching the whole
    /// summary's left-outer semantics. Percentages are still relative to the
    /// election's full vote total.
    pub fn summarize_candidate(
        &self,
        election_id: ElectionId,
        candidate_id: &str,
    ) -> Result<ResultSummary> {
        let state = self.state_read()?;

        if state.membership(election_id).is_none() {
            return Err(Error::ElectionNotFound { id: election_id });
        }
        let election_name = state
            .election_name(election_id)
            .unwrap_or_default()
            .to_string();

        let total_votes = state.vote_count(election_id);
        let vote_count = state.tally(election_id, candidate_id);

        let entry = CandidateResult {
            candidate_id: candidate_id.to_string(),
            candidate_name: state
                .candidate_name(candidate_id)
                .unwrap_or_default()
                .to_string(),
            vote_count,
            percentage: render_percentage(vote_count, total_votes),
        };

        Ok(ResultSummary {
            election_id,
            election_name,
            total_votes,
            results: vec![entry],
        })
    }
}
