//! Process-level error classification.

use credtrust_attestation::CommitError;
use credtrust_core::ConfigError;
use credtrust_crypto::{AuthorizationError, SecretError};
use thiserror::Error;

/// Coarse failure class reported through the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Configuration,
    Authorization,
    Commit,
    Internal,
}

impl ErrorClass {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorClass::Internal => 1,
            ErrorClass::Configuration => 2,
            ErrorClass::Authorization => 3,
            ErrorClass::Commit => 4,
        }
    }
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Secret provisioning error: {0}")]
    Secrets(#[from] SecretError),

    #[error("Authorization error: {0}")]
    Authorization(#[from] AuthorizationError),

    #[error("Commit error: {0}")]
    Commit(#[from] CommitError),

    #[error("Scoring function {scorer} returned score {score} with tier {tier}")]
    ScoringContract {
        scorer: String,
        score: u16,
        tier: String,
    },
}

impl AgentError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AgentError::Config(_) | AgentError::Secrets(_) => ErrorClass::Configuration,
            // A missing app secret is a provisioning mistake, not a denied request
            AgentError::Authorization(AuthorizationError::AppSecretMissing) => {
                ErrorClass::Configuration
            }
            AgentError::Authorization(AuthorizationError::RequesterNotAuthorized { .. }) => {
                ErrorClass::Authorization
            }
            AgentError::Authorization(AuthorizationError::Crypto { .. }) => ErrorClass::Internal,
            AgentError::Commit(_) => ErrorClass::Commit,
            AgentError::ScoringContract { .. } => ErrorClass::Internal,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.class().exit_code()
    }
}
