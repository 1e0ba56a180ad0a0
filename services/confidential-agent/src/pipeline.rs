//! The single-shot enclave pipeline.
//!
//! verify app access -> sign for requester -> load -> score -> commit.
//! Every step runs once, sequentially. Failures before the commit step
//! never touch the output directory.

use credtrust_attestation::{AttestationCommitter, AuthorizationMetadata, Commitment};
use credtrust_core::AgentConfig;
use credtrust_crypto::{AuthorizationVerifier, SecretStore};
use credtrust_protected_data::ProtectedDataLoader;
use credtrust_scoring::{Features, ScoringFunction};

use crate::error::AgentError;

/// Builds the secret store from the configured file (if any) layered under `lookup`.
pub fn load_secrets<F>(config: &AgentConfig, lookup: F) -> Result<SecretStore, AgentError>
where
    F: Fn(&str) -> Option<String>,
{
    let store = match &config.secrets_file {
        Some(path) => SecretStore::from_file_and_lookup(path, lookup)?,
        None => SecretStore::from_lookup(lookup),
    };
    Ok(store)
}

/// Runs one invocation end to end.
pub fn run(
    config: &AgentConfig,
    store: SecretStore,
    scorer: &dyn ScoringFunction,
) -> Result<Commitment, AgentError> {
    config.validate()?;

    tracing::info!(
        profile = %config.profile,
        scorer = scorer.identifier(),
        requester_index = config.requester_index,
        "Starting confidential computation"
    );

    let verifier = AuthorizationVerifier::new(store);
    let model_access = verifier.verify_app_access()?;
    let request_signature = verifier.sign_on_behalf_of(config.requester_index)?;
    let authorization =
        AuthorizationMetadata::from_proofs(verifier.store(), &[model_access, request_signature]);

    let loaded = ProtectedDataLoader::new(config.max_dataset_bytes).load(&config.locator());

    let features = Features::from_record(&loaded.record);
    let result = scorer.score(&features);
    if !result.is_consistent() {
        return Err(AgentError::ScoringContract {
            scorer: scorer.identifier().to_string(),
            score: result.score,
            tier: result.tier.to_string(),
        });
    }
    tracing::info!(score = result.score, tier = %result.tier, "Score computed");

    let commitment = AttestationCommitter::new(&config.output_dir).commit(
        &result,
        &loaded.record,
        scorer.identifier(),
        &loaded.provenance,
        authorization,
    )?;

    tracing::info!(
        descriptor = %commitment.descriptor_path.display(),
        synthetic = commitment.record.synthetic_data,
        "Confidential computation complete"
    );

    Ok(commitment)
}
