//! Scavenge errors.

use crate::ledger::LedgerError;
use crate::store::CodecError;

use super::types::RecordKind;

/// Errors returned by the keeper and the engine.
///
/// None are retried internally; every one aborts the operation before any
/// record or balance changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScavengeError {
    /// A record already occupies the key.
    #[error("{kind} already exists under {key}")]
    DuplicateKey {
        /// Namespace.
        kind: RecordKind,
        /// Hex key.
        key: String,
    },

    /// No record under the key.
    #[error("{kind} not found under {key}")]
    NotFound {
        /// Namespace.
        kind: RecordKind,
        /// Hex key.
        key: String,
    },

    /// Bytes under the key do not parse as the expected record.
    #[error("{kind} under {key} is corrupt: {source}")]
    Decode {
        /// Namespace.
        kind: RecordKind,
        /// Hex key.
        key: String,
        /// Codec failure.
        #[source]
        source: CodecError,
    },

    /// Record could not be encoded.
    #[error("{kind} under {key} could not be encoded: {source}")]
    Encode {
        /// Namespace.
        kind: RecordKind,
        /// Hex key.
        key: String,
        /// Codec failure.
        #[source]
        source: CodecError,
    },

    /// Puzzle already has a solver.
    #[error("puzzle {solution_hash} has already been solved")]
    AlreadySolved {
        /// Puzzle key.
        solution_hash: String,
    },

    /// Escrow or payout rejected by the ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Request failed stateless validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ScavengeError {
    /// Shorthand for a missing puzzle.
    pub fn puzzle_not_found(key: &str) -> Self {
        Self::NotFound {
            kind: RecordKind::Puzzle,
            key: key.to_string(),
        }
    }

    /// Shorthand for a missing commitment.
    pub fn commitment_not_found(key: &str) -> Self {
        Self::NotFound {
            kind: RecordKind::Commitment,
            key: key.to_string(),
        }
    }

    /// Is this a lookup miss in the given namespace?
    pub fn is_not_found(&self, expected: RecordKind) -> bool {
        matches!(self, Self::NotFound { kind, .. } if *kind == expected)
    }

    /// Is this a duplicate in the given namespace?
    pub fn is_duplicate(&self, expected: RecordKind) -> bool {
        matches!(self, Self::DuplicateKey { kind, .. } if *kind == expected)
    }
}

/// Result alias for scavenge operations.
pub type ScavengeResult<T> = Result<T, ScavengeError>;
