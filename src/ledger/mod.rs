//! The election ledger and its collaborators
//!
//! - [`IdentityStore`]: system-wide set of eligible voter identity tokens
//! - [`VoterRegistry`]: voter profile records keyed by voter id
//! - [`ElectionLedger`]: catalog, vote ledger and result projection

pub mod core;
pub mod identity;
pub mod registry;
pub mod results;

pub use self::core::{ElectionLedger, VoteOutcome, VoteRejection};
pub use identity::IdentityStore;
pub use registry::VoterRegistry;
