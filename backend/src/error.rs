//! Engine-wide error taxonomy
//!
//! Every fallible operation in the ledger engine returns one of these
//! variants. The taxonomy is deliberately small:
//!
//! - `NotFound`: a referenced entity does not exist
//! - `Forbidden`: the caller is not allowed to perform the operation
//! - `Conflict`: the operation is valid but the entity is in the wrong
//!   state (tours already generated, payout already processed, ...)
//! - `BadRequest`: malformed input
//! - `InvalidState`: the group itself cannot support the operation
//!   (e.g. generating tours for an empty roster)
//!
//! Errors surface synchronously to the caller; only the batch sweeps
//! log-and-continue per item instead of propagating.

use thiserror::Error;

/// Error returned by ledger engine operations.
///
/// Every variant carries a human-readable reason; callers decide
/// whether and how to retry (the engine never retries on its own).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Caller lacks the required role or is not the rightful actor
    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    /// Entity exists but is in a state that rejects the operation
    #[error("conflict: {reason}")]
    Conflict { reason: String },

    /// Malformed input (invalid bounds, dates, unknown IDs)
    #[error("bad request: {reason}")]
    BadRequest { reason: String },

    /// The aggregate cannot support the operation at all
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
}

impl EngineError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest {
            reason: reason.into(),
        }
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_reason() {
        let err = EngineError::conflict("payout already processed for tour t1");
        assert_eq!(
            err.to_string(),
            "conflict: payout already processed for tour t1"
        );

        let err = EngineError::not_found("tour", "t-missing");
        assert_eq!(err.to_string(), "tour not found: t-missing");
    }
}
