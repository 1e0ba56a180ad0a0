//! Offline commitment verification.
//!
//! A verifier fetches the descriptor, follows it to the result file and
//! re-derives the attestation digest from the fields the result discloses.
//! The computation itself is never re-run. When the verifier also holds the
//! protected record, [`verify_input`] additionally binds the result to it.

use credtrust_core::ProtectedRecord;
use credtrust_crypto::{attestation_digest, parse_hex, to_prefixed_hex, Blake3Hash};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::committer::CommitmentDescriptor;
use crate::error::VerifyError;
use crate::record::{input_fingerprint, result_fingerprint, AttestationRecord};

/// A result that passed verification.
#[derive(Debug, Clone)]
pub struct VerifiedCommitment {
    pub result_path: PathBuf,
    pub record: AttestationRecord,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, VerifyError> {
    let bytes = fs::read(path).map_err(|source| VerifyError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| VerifyError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_field(value: &str, field: &'static str) -> Result<Blake3Hash, VerifyError> {
    parse_hex(value).ok_or(VerifyError::MalformedHash { field })
}

/// Follows a descriptor to its result file and verifies it.
///
/// Relative output paths are resolved against the descriptor's directory.
pub fn verify_commitment(descriptor_path: &Path) -> Result<VerifiedCommitment, VerifyError> {
    let descriptor: CommitmentDescriptor = read_json(descriptor_path)?;

    let result_path = if descriptor.deterministic_output_path.is_absolute() {
        descriptor.deterministic_output_path
    } else {
        descriptor_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(descriptor.deterministic_output_path)
    };

    let record: AttestationRecord = read_json(&result_path)?;
    verify_record(&record)?;

    tracing::info!(
        path = %result_path.display(),
        attestation = %record.attestation,
        synthetic = record.synthetic_data,
        "Commitment verified"
    );

    Ok(VerifiedCommitment {
        result_path,
        record,
    })
}

/// Checks a result payload for internal consistency.
pub fn verify_record(record: &AttestationRecord) -> Result<(), VerifyError> {
    let score = record.score_result();
    if !score.is_consistent() {
        return Err(VerifyError::ScoreContract {
            score: record.score,
            tier: record.tier.to_string(),
        });
    }

    let claimed_result = parse_field(&record.result_fingerprint, "resultFingerprint")?;
    if result_fingerprint(&score)? != claimed_result {
        return Err(VerifyError::ResultFingerprintMismatch);
    }

    let claimed_input = parse_field(&record.input_fingerprint, "inputFingerprint")?;
    let claimed_attestation = parse_field(&record.attestation, "attestation")?;

    let expected = attestation_digest(&claimed_result, &claimed_input, &record.scoring_function);
    if expected != claimed_attestation {
        return Err(VerifyError::AttestationMismatch {
            expected: to_prefixed_hex(&expected),
            found: record.attestation.clone(),
        });
    }

    Ok(())
}

/// Confirms the result was computed over `input`.
pub fn verify_input(record: &AttestationRecord, input: &ProtectedRecord) -> Result<(), VerifyError> {
    let claimed = parse_field(&record.input_fingerprint, "inputFingerprint")?;
    if input_fingerprint(input)? != claimed {
        return Err(VerifyError::InputFingerprintMismatch);
    }
    Ok(())
}
