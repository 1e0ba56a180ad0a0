//! Attestation record: the deterministic result payload.

use credtrust_core::{CoreError, ProtectedRecord, ScoreResult, Tier};
use credtrust_crypto::{
    attestation_digest, fingerprint_bytes, fingerprint_json, to_prefixed_hex,
    AuthorizationProof, Blake3Hash, SecretStore, SecretTier,
};
use credtrust_protected_data::DataProvenance;
use serde::{Deserialize, Serialize};

use crate::error::CommitError;

/// Number of hex characters of the requester signature disclosed in output.
pub const SIGNATURE_PREFIX_CHARS: usize = 16;

/// Which secrets backed this invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationMetadata {
    pub app_secret_used: bool,
    pub requester_secrets: usize,
    pub tiers_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_signature: Option<String>,
}

impl AuthorizationMetadata {
    /// Summarizes the proofs actually derived, plus the store's availability counts.
    pub fn from_proofs(store: &SecretStore, proofs: &[AuthorizationProof]) -> Self {
        let app_proof = proofs.iter().find(|p| p.tier == SecretTier::AppSecret);
        let requester_proof = proofs
            .iter()
            .find(|p| matches!(p.tier, SecretTier::RequesterSecret(_)));

        Self {
            app_secret_used: app_proof.is_some(),
            requester_secrets: store.requester_secret_count(),
            tiers_used: proofs.iter().map(|p| p.tier.to_string()).collect(),
            model_access: app_proof.map(AuthorizationProof::to_hex),
            requester_signature: requester_proof.map(|p| p.abbreviated(SIGNATURE_PREFIX_CHARS)),
        }
    }
}

/// Full result payload written to the deterministic output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationRecord {
    pub score: u16,
    pub tier: Tier,
    pub wallet: String,
    pub scoring_function: String,
    pub result_fingerprint: String,
    pub input_fingerprint: String,
    pub attestation: String,
    pub synthetic_data: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthetic_reason: Option<String>,
    #[serde(flatten)]
    pub authorization: AuthorizationMetadata,
}

/// The three digests an attestation is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttestationDigests {
    pub result_fingerprint: Blake3Hash,
    pub input_fingerprint: Blake3Hash,
    pub attestation: Blake3Hash,
}

/// Fingerprint of the `(score, tier)` pair.
pub fn result_fingerprint(result: &ScoreResult) -> Result<Blake3Hash, serde_json::Error> {
    fingerprint_json(result)
}

/// Fingerprint of the protected record's canonical encoding.
pub fn input_fingerprint(record: &ProtectedRecord) -> Result<Blake3Hash, CoreError> {
    Ok(fingerprint_bytes(&record.canonical_bytes()?))
}

/// Derives all digests for a result, its input and the scorer that produced it.
pub fn compute_digests(
    result: &ScoreResult,
    record: &ProtectedRecord,
    scorer_id: &str,
) -> Result<AttestationDigests, CoreError> {
    let result_fingerprint = result_fingerprint(result)?;
    let input_fingerprint = input_fingerprint(record)?;
    let attestation = attestation_digest(&result_fingerprint, &input_fingerprint, scorer_id);

    Ok(AttestationDigests {
        result_fingerprint,
        input_fingerprint,
        attestation,
    })
}

impl AttestationRecord {
    pub fn build(
        result: &ScoreResult,
        record: &ProtectedRecord,
        scorer_id: &str,
        provenance: &DataProvenance,
        authorization: AuthorizationMetadata,
    ) -> Result<Self, CommitError> {
        let digests = compute_digests(result, record, scorer_id)?;

        Ok(Self {
            score: result.score,
            tier: result.tier,
            wallet: record.address.clone(),
            scoring_function: scorer_id.to_string(),
            result_fingerprint: to_prefixed_hex(&digests.result_fingerprint),
            input_fingerprint: to_prefixed_hex(&digests.input_fingerprint),
            attestation: to_prefixed_hex(&digests.attestation),
            synthetic_data: provenance.is_synthetic(),
            synthetic_reason: provenance.synthetic_reason().map(str::to_string),
            authorization,
        })
    }

    pub fn score_result(&self) -> ScoreResult {
        ScoreResult {
            score: self.score,
            tier: self.tier,
        }
    }
}
