//! Error types for the diff crate.

use apidelta_types::ModelError;

/// Errors that can occur around a diff run.
///
/// The reconciliation itself is infallible; these cover configuration,
/// boundary validation and serialization of the result.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The diff configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Input snapshots or hierarchy failed boundary validation.
    #[error("malformed input: {0}")]
    Model(#[from] ModelError),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
