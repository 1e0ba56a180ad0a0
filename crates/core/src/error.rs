//! Core error types

use thiserror::Error;

/// Core error type for CredTrust
#[derive(Debug, Error)]
pub enum CoreError {
    /// A protected record failed structural validation
    #[error("Invalid record field '{field}': {reason}")]
    InvalidRecord { field: String, reason: String },

    /// Canonical serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used across the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
