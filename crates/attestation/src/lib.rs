//! Attestation and commitment for the CredTrust confidential agent.
//!
//! This crate turns a score into an attestable artifact:
//!
//! - **Record**: the deterministic result payload with its BLAKE3 digests
//! - **Committer**: two-step, atomic write of result then descriptor
//! - **Verifier**: offline re-derivation of the attestation from a descriptor
//!
//! # Attestation Scheme
//!
//! ```text
//! result_fingerprint = BLAKE3(canonical_json({score, tier}))
//! input_fingerprint  = BLAKE3(canonical_json(protected_record))
//! attestation        = BLAKE3(result_fingerprint || input_fingerprint || scorer_id)
//! ```

pub mod committer;
pub mod error;
pub mod record;
pub mod verifier;

/// Version tag of the attestation scheme documented above.
pub const ATTESTATION_SCHEME: &str = "credtrust-attestation-v1";

pub use committer::{
    AttestationCommitter, Commitment, CommitmentDescriptor, DESCRIPTOR_FILE, RESULT_FILE,
};
pub use error::{CommitError, VerifyError};
pub use record::{
    compute_digests, input_fingerprint, result_fingerprint, AttestationDigests,
    AttestationRecord, AuthorizationMetadata, SIGNATURE_PREFIX_CHARS,
};
pub use verifier::{verify_commitment, verify_input, verify_record, VerifiedCommitment};
