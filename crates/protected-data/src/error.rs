//! Error types for protected data loading.
//!
//! These errors are recovered inside the loader by substituting the
//! synthetic record; they surface only through [`try_load`] and in the
//! provenance reason.
//!
//! [`try_load`]: crate::ProtectedDataLoader::try_load

use std::path::PathBuf;
use thiserror::Error;

/// The protected dataset was absent or could not be decoded.
#[derive(Debug, Error)]
pub enum DataIntegrityError {
    #[error("No protected dataset filename provided")]
    DatasetNotProvided,

    #[error("Protected dataset unreadable at {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Protected dataset exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("Protected dataset undecodable: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Protected dataset invalid: {0}")]
    Invalid(String),
}
