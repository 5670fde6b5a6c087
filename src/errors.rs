//! Error kinds surfaced by parsing, distribution and recovery.

use thiserror::Error;

/// Everything that can go wrong between a predicate string and a
/// recovered secret. All variants propagate to the top-level call;
/// nothing is retried internally.
#[derive(Debug, Error)]
pub enum MspError {
    /// Malformed predicate string: unbalanced parentheses, a missing or
    /// non-numeric threshold, an empty gate, or similar.
    #[error("invalid predicate: {0}")]
    InvalidPredicate(String),

    /// The predicate references a participant the user database does
    /// not recognize. Raised during distribution only.
    #[error("unknown participant {0:?}")]
    UnknownParticipant(String),

    /// The secret's length matches none of the configured fields.
    #[error("no field for a secret of {0} bytes")]
    UnsupportedSecretSize(usize),

    /// The reachable shares cannot satisfy the root gate.
    #[error("not enough shares to satisfy the predicate")]
    InsufficientShares,

    /// A participant's share list is shorter than the predicate
    /// expects, which means the database and the predicate have
    /// diverged since distribution.
    #[error("share list for {name:?} has no entry {index}")]
    DatabaseMismatch { name: String, index: usize },

    /// The Vandermonde submatrix for the participating rows is not
    /// invertible. Cannot happen with distinct share indexes; surfaced
    /// rather than swallowed in case of an upstream bug.
    #[error("no reconstruction vector for the participating shares")]
    SingularSubmatrix,

    /// The random byte source failed while drawing coefficients.
    #[error("randomness source failed: {0}")]
    RandomnessFailure(#[from] rand::Error),
}
