//! Authorization Verifier - proof of secret possession per tier.
//!
//! Before the agent touches protected data it proves that it holds:
//!
//! 1. the application secret, which gates access to the scoring capability
//! 2. the requester secret named by the invocation, which binds the run to
//!    the party that asked for it
//!
//! Each proof is an HMAC-SHA256 of a fixed, tier-specific context string
//! keyed by the tier's secret. The proof commits to the secret without
//! revealing it; it is not encryption.
//!
//! # Security Model
//!
//! - Fail closed: a missing app secret aborts before any scoring
//! - No existence oracle: an out-of-range requester index and an unmapped
//!   one produce the same error value
//! - Deterministic: the same secret always yields the same proof
//! - Pure: no disk or network access happens here

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::secrets::{SecretStore, SecretTier};

type HmacSha256 = Hmac<Sha256>;

/// Context string for the application secret proof.
pub const MODEL_ACCESS_CONTEXT: &str = "model-access-v1";

/// Context string for the requester secret proof.
pub const REQUEST_SIGNATURE_CONTEXT: &str = "request-signature-v1";

/// Length of every proof digest in bytes.
pub const PROOF_LEN: usize = 32;

/// Errors raised while deriving authorization proofs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("App secret required for model access")]
    AppSecretMissing,

    #[error("Requester secret {index} not authorized")]
    RequesterNotAuthorized { index: u32 },

    /// MAC key setup rejected the secret. HMAC accepts keys of any length,
    /// so this is unreachable with SHA-256; it exists so key setup reports
    /// an error instead of panicking if the MAC is ever swapped.
    #[error("Cryptographic error: {reason}")]
    Crypto { reason: String },
}

/// Proof that the holder possesses the secret of one tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationProof {
    pub tier: SecretTier,
    pub context: &'static str,
    pub digest: [u8; PROOF_LEN],
}

impl AuthorizationProof {
    pub fn to_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// Shortened rendering suitable for result payloads: the first
    /// `chars` hex characters followed by `...`.
    pub fn abbreviated(&self, chars: usize) -> String {
        let full = self.to_hex();
        let cut = chars.min(full.len());
        format!("{}...", &full[..cut])
    }
}

/// Computes HMAC-SHA256 of `context` keyed by `secret`.
pub fn keyed_digest(secret: &[u8], context: &str) -> Result<[u8; PROOF_LEN], AuthorizationError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|e| AuthorizationError::Crypto {
        reason: e.to_string(),
    })?;
    mac.update(context.as_bytes());

    let mut digest = [0u8; PROOF_LEN];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    Ok(digest)
}

/// Gatekeeper that owns the secret store for the lifetime of one invocation.
#[derive(Debug)]
pub struct AuthorizationVerifier {
    store: SecretStore,
}

impl AuthorizationVerifier {
    pub fn new(store: SecretStore) -> Self {
        Self { store }
    }

    /// Read-only view used to report which secrets were available.
    pub fn store(&self) -> &SecretStore {
        &self.store
    }

    /// Proves possession of the application secret.
    pub fn verify_app_access(&self) -> Result<AuthorizationProof, AuthorizationError> {
        let secret = self.store.app_secret().ok_or_else(|| {
            tracing::error!("App secret missing, refusing model access");
            AuthorizationError::AppSecretMissing
        })?;

        let digest = keyed_digest(secret, MODEL_ACCESS_CONTEXT)?;
        tracing::debug!(tier = %SecretTier::AppSecret, "Model access proof derived");

        Ok(AuthorizationProof {
            tier: SecretTier::AppSecret,
            context: MODEL_ACCESS_CONTEXT,
            digest,
        })
    }

    /// Proves the requester at `index` authorized this invocation.
    pub fn sign_on_behalf_of(&self, index: u32) -> Result<AuthorizationProof, AuthorizationError> {
        // Range check and lookup collapse into one branch so both failures
        // are indistinguishable to the caller.
        let (tier, secret) = match SecretTier::requester(index)
            .and_then(|tier| self.store.requester_secret(index).map(|secret| (tier, secret)))
        {
            Some(found) => found,
            None => {
                tracing::error!(requester_index = index, "Requester secret not authorized");
                return Err(AuthorizationError::RequesterNotAuthorized { index });
            }
        };

        let digest = keyed_digest(secret, REQUEST_SIGNATURE_CONTEXT)?;
        tracing::debug!(tier = %tier, "Request signature derived");

        Ok(AuthorizationProof {
            tier,
            context: REQUEST_SIGNATURE_CONTEXT,
            digest,
        })
    }

    /// Recomputes `proof` from the held secret and compares in constant time.
    pub fn verify_proof(&self, proof: &AuthorizationProof) -> bool {
        let secret = match proof.tier {
            SecretTier::AppSecret => self.store.app_secret(),
            SecretTier::RequesterSecret(index) => self.store.requester_secret(index),
        };

        let Some(secret) = secret else {
            return false;
        };

        match HmacSha256::new_from_slice(secret) {
            Ok(mut mac) => {
                mac.update(proof.context.as_bytes());
                mac.verify_slice(&proof.digest).is_ok()
            }
            Err(_) => false,
        }
    }
}
