//! Error types for TSS-PV operations

use thiserror::Error;

/// Result type for TSS-PV operations
pub type Result<T> = std::result::Result<T, TsspvError>;

/// Errors that can occur while dealing, reconstructing or tracing
#[derive(Debug, Error)]
pub enum TsspvError {
    /// Invalid threshold
    #[error("Invalid threshold: {threshold} must be <= {players} and >= 2")]
    InvalidThreshold { threshold: usize, players: usize },

    /// Collusion bound out of range
    #[error("Invalid collusion bound: {collusion} must be < threshold - 1 (threshold = {threshold})")]
    InvalidCollusionBound { collusion: usize, threshold: usize },

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Not enough distinct valid shares to interpolate
    #[error("Insufficient shares: need {needed}, got {got}")]
    InsufficientShares { needed: usize, got: usize },

    /// A zero-knowledge proof did not verify
    #[error("Proof verification failed: {0}")]
    ProofVerificationFailure(String),

    /// Transcript, shares and keys disagree with each other
    #[error("Inconsistent transcript: {0}")]
    InconsistentTranscript(String),

    /// Bytes do not decode to a group element or scalar
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for TsspvError {
    fn from(e: serde_json::Error) -> Self {
        TsspvError::Serialization(e.to_string())
    }
}

impl From<hex::FromHexError> for TsspvError {
    fn from(e: hex::FromHexError) -> Self {
        TsspvError::Decoding(e.to_string())
    }
}
