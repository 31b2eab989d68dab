//! Error handling for the election ledger
//!
//! Infrastructure and caller-mistake failures live in [`Error`]. Vote
//! rejections are normal outcomes of `cast_vote` and are value-returned
//! through `VoteOutcome`, never through this type.

/// Result type alias for the election ledger
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the election ledger
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No election exists with the given identifier
    #[error("Election {id} not found")]
    ElectionNotFound { id: i64 },

    /// A voter profile with this id is already registered
    #[error("Voter {id} is already registered")]
    DuplicateVoter { id: String },

    /// Administrative secret mismatch on a privileged action
    #[error("Not permitted to carry out this action")]
    Unauthorized,

    /// Inbound payload failed shape validation at the boundary
    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    /// Storage-layer failure (lock poisoning, backend loss); fatal for the
    /// in-flight operation and never swallowed
    #[error("Storage failure: {message}")]
    Storage { message: String },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid or missing configuration
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Create a new malformed-payload error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new duplicate-voter error
    pub fn duplicate_voter(id: impl Into<String>) -> Self {
        Self::DuplicateVoter { id: id.into() }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Convenience macro for storage errors with formatting
#[macro_export]
macro_rules! storage_error {
    ($msg:expr) => {
        $crate::Error::storage($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::storage(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let storage_err = Error::storage("backend unavailable");
        assert!(matches!(storage_err, Error::Storage { .. }));

        let malformed_err = Error::malformed("missing field `voterId`");
        assert!(matches!(malformed_err, Error::MalformedPayload { .. }));

        let dup_err = Error::duplicate_voter("V1");
        assert!(matches!(dup_err, Error::DuplicateVoter { .. }));
    }

    #[test]
    fn test_error_macro() {
        let err = storage_error!("lock poisoned on {}", "votes");
        assert!(matches!(err, Error::Storage { .. }));
        assert!(err.to_string().contains("votes"));
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::ElectionNotFound { id: 42 };
        assert_eq!(err.to_string(), "Election 42 not found");
    }
}
