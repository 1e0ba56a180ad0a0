//! Cryptographic primitives for the CredTrust confidential agent.
//!
//! This crate owns every operation that touches secret material or produces
//! an integrity commitment:
//!
//! - **Secret Store**: bounded, tiered classification of provisioned secrets
//! - **Authorization**: HMAC-SHA256 proofs of secret possession per tier
//! - **Fingerprints**: BLAKE3 content hashes and the attestation digest
//!
//! # Security Principles
//!
//! - Never roll custom cryptographic primitives
//! - Secrets must never be logged or hardcoded
//! - Secret bytes are zeroized on drop
//! - Proof comparison is constant-time
//! - BLAKE3 for all integrity fingerprints

pub mod authorization;
pub mod fingerprint;
pub mod secrets;

pub use authorization::{
    keyed_digest, AuthorizationError, AuthorizationProof, AuthorizationVerifier,
    MODEL_ACCESS_CONTEXT, PROOF_LEN, REQUEST_SIGNATURE_CONTEXT,
};
pub use fingerprint::{
    attestation_digest, fingerprint_bytes, fingerprint_json, parse_hex, to_prefixed_hex,
    Blake3Hash,
};
pub use secrets::{
    SecretError, SecretStore, SecretTier, APP_SECRET_KEY, LEGACY_APP_SECRET_KEY,
    MAX_REQUESTER_INDEX, REQUESTER_SECRET_PREFIX,
};
