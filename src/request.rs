//! Boundary decode and dispatch for inbound action envelopes
//!
//! Inbound messages arrive as a JSON envelope `{action, data, secretKey?}`.
//! Decoding produces a typed [`Request`] or a `MalformedPayload` error before
//! any core operation is invoked; nothing duck-typed crosses this boundary.
//! Privileged actions are authorized against the injected [`AdminSecret`]
//! before the catalog is touched.

use crate::config::AdminSecret;
use crate::ledger::{ElectionLedger, VoteOutcome};
use crate::types::{Candidate, ElectionId, VoterProfile};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Raw inbound envelope, decoded in two stages: the envelope shape first,
/// then the action-specific payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub action: String,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(rename = "secretKey")]
    pub secret_key: Option<String>,
}

/// Payload for the `VOTE` action
#[derive(Debug, Clone, Deserialize)]
pub struct VotePayload {
    #[serde(rename = "electionId")]
    pub election_id: ElectionId,
    #[serde(rename = "voterId")]
    pub voter_id: String,
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
}

/// Payload for the `CREATE_ELECTION` action. Candidates may be supplied
/// inline and are added to the new election in order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateElectionPayload {
    pub name: String,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Payload for the `END_ELECTION` action
#[derive(Debug, Clone, Deserialize)]
pub struct EndElectionPayload {
    pub id: ElectionId,
}

/// A fully decoded, typed request.
#[derive(Debug, Clone)]
pub enum Request {
    RegisterVoter(VoterProfile),
    Vote(VotePayload),
    CreateElection(CreateElectionPayload),
    EndElection(EndElectionPayload),
    RegisterVoterIds(Vec<String>),
}

impl Envelope {
    /// Parse an envelope from its JSON text.
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::malformed(format!("invalid envelope: {e}")))
    }

    /// Decode the action-specific payload into a typed [`Request`].
    ///
    /// Unknown actions and shape mismatches are `MalformedPayload`; the core
    /// is never invoked with an undecoded payload.
    pub fn decode(&self) -> Result<Request> {
        fn payload<T: serde::de::DeserializeOwned>(
            action: &str,
            data: &serde_json::Value,
        ) -> Result<T> {
            serde_json::from_value(data.clone())
                .map_err(|e| Error::malformed(format!("arguments to {action} are not correct: {e}")))
        }

        match self.action.as_str() {
            "REGISTER_VOTER" => Ok(Request::RegisterVoter(payload(&self.action, &self.data)?)),
            "VOTE" => Ok(Request::Vote(payload(&self.action, &self.data)?)),
            "CREATE_ELECTION" => Ok(Request::CreateElection(payload(&self.action, &self.data)?)),
            "END_ELECTION" => Ok(Request::EndElection(payload(&self.action, &self.data)?)),
            "REGISTER_VOTER_IDs" => Ok(Request::RegisterVoterIds(payload(&self.action, &self.data)?)),
            other => Err(Error::malformed(format!("invalid action: {other}"))),
        }
    }
}

/// Outcome notice for the caller, mirroring the success/error notices the
/// outer message layer emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub success: bool,
    pub message: String,
    /// JSON snapshot attached to `END_ELECTION` (the results voucher)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voucher: Option<String>,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            voucher: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            voucher: None,
        }
    }
}

/// Check the presented secret for a privileged action.
fn authorize(admin: &AdminSecret, secret_key: Option<&str>) -> Result<()> {
    match secret_key {
        Some(presented) if admin.verify(presented) => Ok(()),
        _ => Err(Error::Unauthorized),
    }
}

/// Render a typed core error as an error notice; infrastructure failures
/// propagate instead of being swallowed into a notice.
fn error_notice(err: Error) -> Result<Notice> {
    match err {
        Error::Storage { .. } | Error::Serialization(_) => Err(err),
        other => Ok(Notice::error(other.to_string())),
    }
}

/// Decode an envelope and apply it to the ledger, producing a notice.
///
/// `CREATE_ELECTION` and `END_ELECTION` require the administrative secret;
/// a mismatch is reported as a permission failure and the core is never
/// invoked. Storage failures propagate as errors.
pub fn dispatch(ledger: &ElectionLedger, admin: &AdminSecret, envelope: &Envelope) -> Result<Notice> {
    let request = match envelope.decode() {
        Ok(request) => request,
        Err(err) => return error_notice(err),
    };

    match request {
        Request::RegisterVoter(profile) => match ledger.register_voter(profile) {
            Ok(()) => Ok(Notice::success("Voter has been registered")),
            Err(err) => error_notice(err),
        },

        Request::RegisterVoterIds(ids) => {
            let added = ledger.register_identities(ids)?;
            Ok(Notice::success(format!(
                "Registered {added} new voter identities"
            )))
        }

        Request::Vote(vote) => {
            match ledger.cast_vote(vote.election_id, &vote.voter_id, &vote.candidate_id) {
                Ok(VoteOutcome::Accepted(_)) => Ok(Notice::success("Vote has been cast")),
                Ok(VoteOutcome::Rejected(rejection)) => Ok(Notice::error(rejection.to_string())),
                Err(err) => error_notice(err),
            }
        }

        Request::CreateElection(payload) => {
            if let Err(err) = authorize(admin, envelope.secret_key.as_deref()) {
                return error_notice(err);
            }
            let id = ledger.create_election(payload.name)?;
            for candidate in payload.candidates {
                ledger.add_candidate_to_election(id, candidate)?;
            }
            Ok(Notice::success(format!("Election {id} has been created")))
        }

        Request::EndElection(payload) => {
            if let Err(err) = authorize(admin, envelope.secret_key.as_deref()) {
                return error_notice(err);
            }
            match ledger.summarize(payload.id) {
                Ok(summary) => {
                    let voucher = serde_json::to_string(&summary)?;
                    Ok(Notice {
                        success: true,
                        message: "Election has ended".to_string(),
                        voucher: Some(voucher),
                    })
                }
                Err(err) => error_notice(err),
            }
        }
    }
}

/// Serve the read-only result routes.
///
/// `result/{election}` returns the full summary, `result/{election}/{candidate}`
/// the single-candidate view, both as `{"data": <summary>}` JSON.
pub fn inspect(ledger: &ElectionLedger, path: &str) -> Result<String> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    let summary = match segments.as_slice() {
        ["result", election] => {
            let id = parse_election_id(election)?;
            ledger.summarize(id)?
        }
        ["result", election, candidate] => {
            let id = parse_election_id(election)?;
            ledger.summarize_candidate(id, candidate)?
        }
        _ => return Err(Error::malformed(format!("unknown route: {path}"))),
    };

    Ok(serde_json::to_string(&serde_json::json!({ "data": summary }))?)
}

fn parse_election_id(raw: &str) -> Result<ElectionId> {
    raw.parse()
        .map_err(|_| Error::malformed(format!("invalid election id: {raw}")))
}
