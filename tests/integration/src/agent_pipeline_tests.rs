//! Full pipeline scenarios driven through `credtrust_agent::run`

use crate::test_utils::*;
use credtrust_agent::{pipeline, AgentError, ErrorClass};
use credtrust_attestation::{verify_commitment, verify_input, DESCRIPTOR_FILE, RESULT_FILE};
use credtrust_core::{ScoringProfile, Tier};
use credtrust_crypto::AuthorizationError;
use credtrust_protected_data::{decode_record, SYNTHETIC_ADDRESS};
use credtrust_scoring::scorer_for_profile;

fn provisioned() -> credtrust_crypto::SecretStore {
    store_from(&[
        ("IEXEC_APP_DEVELOPER_SECRET", "k1"),
        ("IEXEC_REQUESTER_SECRET_1", "k2"),
    ])
}

#[test]
fn test_reference_scenario() {
    init_tracing();
    let fixture = EnclaveFixture::new();
    fixture.stage_dataset(REFERENCE_WALLET);
    let config = fixture.config(Some(DATASET_FILENAME));

    let commitment = pipeline::run(&config, provisioned(), &MockScorer::new(720)).unwrap();

    let result = fixture.read_output(RESULT_FILE);
    assert_eq!(result["score"], 720);
    assert_eq!(result["tier"], "B");
    assert_eq!(result["appSecretUsed"], true);
    assert_eq!(result["requesterSecrets"], 1);
    assert_eq!(result["syntheticData"], false);
    assert_eq!(result["scoringFunction"], "mock-scorer-v1");
    assert_eq!(result["wallet"], "0x1234567890abcdef1234567890abcdef12345678");
    assert_eq!(result["tiersUsed"], serde_json::json!(["app", "requester-1"]));
    assert!(result.get("syntheticReason").is_none());
    assert!(result.get("privateKey").is_none());

    let signature = result["requesterSignature"].as_str().unwrap();
    assert_eq!(signature.len(), 19);
    assert!(signature.ends_with("..."));
    assert_eq!(result["modelAccess"].as_str().unwrap().len(), 64);

    let descriptor = fixture.read_output(DESCRIPTOR_FILE);
    let named = descriptor["deterministic-output-path"].as_str().unwrap();
    assert!(std::path::Path::new(named).is_absolute());
    assert_eq!(
        std::path::Path::new(named),
        commitment.descriptor.deterministic_output_path
    );
    assert!(std::path::Path::new(named).exists());

    let verified = verify_commitment(&commitment.descriptor_path).unwrap();
    let input = decode_record(REFERENCE_WALLET.as_bytes()).unwrap();
    assert!(verify_input(&verified.record, &input).is_ok());
}

#[test]
fn test_missing_app_secret_touches_nothing() {
    init_tracing();
    let fixture = EnclaveFixture::new();
    fixture.stage_dataset(REFERENCE_WALLET);
    let config = fixture.config(Some(DATASET_FILENAME));

    let store = store_from(&[("IEXEC_REQUESTER_SECRET_1", "k2")]);
    let err = pipeline::run(&config, store, &MockScorer::new(720)).unwrap_err();

    assert!(matches!(
        err,
        AgentError::Authorization(AuthorizationError::AppSecretMissing)
    ));
    assert_eq!(err.class(), ErrorClass::Configuration);
    assert_ne!(err.exit_code(), 0);
    assert!(!fixture.output_dir().exists());
}

#[test]
fn test_unreadable_dataset_degrades_to_synthetic() {
    init_tracing();
    let fixture = EnclaveFixture::new();
    // Filename provided but never staged
    let config = fixture.config(Some(DATASET_FILENAME));

    let commitment = pipeline::run(&config, provisioned(), &MockScorer::new(600)).unwrap();

    let result = fixture.read_output(RESULT_FILE);
    assert_eq!(result["syntheticData"], true);
    assert_eq!(result["wallet"], SYNTHETIC_ADDRESS);
    assert!(result["syntheticReason"]
        .as_str()
        .unwrap()
        .contains(DATASET_FILENAME));
    assert!(commitment.record.synthetic_data);
}

#[test]
fn test_no_dataset_filename_degrades_to_synthetic() {
    let fixture = EnclaveFixture::new();
    let config = fixture.config(None);

    pipeline::run(&config, provisioned(), &MockScorer::new(600)).unwrap();
    assert_eq!(fixture.read_output(RESULT_FILE)["syntheticData"], true);
}

#[test]
fn test_requester_index_out_of_range_fails_closed() {
    let fixture = EnclaveFixture::new();
    fixture.stage_dataset(REFERENCE_WALLET);

    let mut unmapped = fixture.config(Some(DATASET_FILENAME));
    unmapped.requester_index = 3;
    let unmapped_err = pipeline::run(&unmapped, provisioned(), &MockScorer::new(720)).unwrap_err();

    let mut out_of_range = fixture.config(Some(DATASET_FILENAME));
    out_of_range.requester_index = 11;
    let range_err =
        pipeline::run(&out_of_range, provisioned(), &MockScorer::new(720)).unwrap_err();

    assert_eq!(unmapped_err.class(), ErrorClass::Authorization);
    assert_eq!(range_err.class(), ErrorClass::Authorization);
    assert_eq!(unmapped_err.exit_code(), 3);
    assert!(!fixture.output_dir().exists());
}

#[test]
fn test_unaddressable_invocation_index_fails_like_unmapped() {
    let fixture = EnclaveFixture::new();
    fixture.stage_dataset(REFERENCE_WALLET);

    for args in [
        r#"{"secretIndex": -1}"#,
        r#"{"secretIndex": 4294967296}"#,
        r#"{"secretIndex": 3}"#,
    ] {
        let config = fixture
            .config(Some(DATASET_FILENAME))
            .with_env_overrides(lookup_from(&[("IEXEC_ARGS", args)]))
            .unwrap();

        let err = pipeline::run(&config, provisioned(), &MockScorer::new(720)).unwrap_err();
        assert!(matches!(
            err,
            AgentError::Authorization(AuthorizationError::RequesterNotAuthorized { .. })
        ));
        assert_eq!(err.exit_code(), 3);
    }
    assert!(!fixture.output_dir().exists());
}

#[test]
fn test_tier_boundaries_through_pipeline() {
    for (score, tier) in [(750, "A"), (749, "B"), (650, "B"), (550, "C"), (549, "D")] {
        let fixture = EnclaveFixture::new();
        fixture.stage_dataset(REFERENCE_WALLET);
        let config = fixture.config(Some(DATASET_FILENAME));

        let commitment = pipeline::run(&config, provisioned(), &MockScorer::new(score)).unwrap();
        assert_eq!(fixture.read_output(RESULT_FILE)["tier"], tier);
        assert_eq!(commitment.record.tier, Tier::from_score(score));
    }
}

#[test]
fn test_builtin_profiles_commit_verifiable_results() {
    for profile in [ScoringProfile::Lightweight, ScoringProfile::Full] {
        let fixture = EnclaveFixture::new();
        fixture.stage_dataset(REFERENCE_WALLET);
        let mut config = fixture.config(Some(DATASET_FILENAME));
        config.profile = profile;

        let scorer = scorer_for_profile(profile);
        let commitment = pipeline::run(&config, provisioned(), scorer.as_ref()).unwrap();

        assert_eq!(commitment.record.scoring_function, scorer.identifier());
        assert!(verify_commitment(&commitment.descriptor_path).is_ok());
    }
}

#[test]
fn test_identical_inputs_produce_identical_results() {
    let first = EnclaveFixture::new();
    let second = EnclaveFixture::new();
    for fixture in [&first, &second] {
        fixture.stage_dataset(REFERENCE_WALLET);
        let config = fixture.config(Some(DATASET_FILENAME));
        pipeline::run(&config, provisioned(), &MockScorer::new(720)).unwrap();
    }

    let read = |fixture: &EnclaveFixture| {
        std::fs::read(fixture.output_dir().join(RESULT_FILE)).unwrap()
    };
    assert_eq!(read(&first), read(&second));
}
