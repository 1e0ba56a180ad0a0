//! Error types for attestation commitment and verification.

use credtrust_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while producing the committed artifacts. All are fatal.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to encode record: {0}")]
    Encoding(#[from] CoreError),
}

/// Failures while checking a committed result offline.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed hash in field '{field}'")]
    MalformedHash { field: &'static str },

    #[error("Score {score} with tier {tier} violates the scoring contract")]
    ScoreContract { score: u16, tier: String },

    #[error("Result fingerprint does not match score and tier")]
    ResultFingerprintMismatch,

    #[error("Input fingerprint does not match the supplied record")]
    InputFingerprintMismatch,

    #[error("Attestation digest mismatch: expected {expected}, found {found}")]
    AttestationMismatch { expected: String, found: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to encode record: {0}")]
    Encoding(#[from] CoreError),
}
