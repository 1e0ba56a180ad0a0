//! Core functionality for the CredTrust confidential computation agent.
//!
//! This crate provides the fundamental types, configuration and logging
//! used by every stage of the enclave pipeline: secret verification,
//! protected data loading, scoring and commitment.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{
    AgentConfig, ConfigError, DatasetLocator, LogFormat, ScoringProfile, UNMAPPED_REQUESTER_INDEX,
};
pub use error::{CoreError, Result};
pub use types::{ProtectedRecord, ScoreResult, Tier, Transaction, SCORE_MAX, SCORE_MIN};
