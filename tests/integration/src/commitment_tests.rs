//! Commitment artifacts and offline verification

use crate::test_utils::*;
use credtrust_agent::pipeline;
use credtrust_attestation::{
    verify_commitment, AttestationCommitter, AttestationRecord, VerifyError, DESCRIPTOR_FILE,
    RESULT_FILE,
};
use credtrust_crypto::SecretStore;
use std::fs;

fn provisioned() -> SecretStore {
    store_from(&[
        ("IEXEC_APP_DEVELOPER_SECRET", "k1"),
        ("IEXEC_REQUESTER_SECRET_1", "k2"),
    ])
}

#[test]
fn test_exactly_two_artifacts() {
    let fixture = EnclaveFixture::new();
    fixture.stage_dataset(REFERENCE_WALLET);
    pipeline::run(
        &fixture.config(Some(DATASET_FILENAME)),
        provisioned(),
        &MockScorer::new(720),
    )
    .unwrap();

    let mut names: Vec<String> = fs::read_dir(fixture.output_dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec![DESCRIPTOR_FILE, RESULT_FILE]);
}

#[test]
fn test_rerun_into_existing_output_dir() {
    let fixture = EnclaveFixture::new();
    fixture.stage_dataset(REFERENCE_WALLET);
    let config = fixture.config(Some(DATASET_FILENAME));

    let first = pipeline::run(&config, provisioned(), &MockScorer::new(720)).unwrap();
    let second = pipeline::run(&config, provisioned(), &MockScorer::new(720)).unwrap();
    assert_eq!(first.record, second.record);
    assert_eq!(first.descriptor, second.descriptor);
}

#[test]
fn test_commit_failure_leaves_no_descriptor() {
    let fixture = EnclaveFixture::new();
    fixture.stage_dataset(REFERENCE_WALLET);
    let config = fixture.config(Some(DATASET_FILENAME));

    fs::create_dir_all(fixture.output_dir().join(RESULT_FILE)).unwrap();

    let err = pipeline::run(&config, provisioned(), &MockScorer::new(720)).unwrap_err();
    assert_eq!(err.exit_code(), 4);
    assert!(!fixture.output_dir().join(DESCRIPTOR_FILE).exists());
}

#[test]
fn test_tampered_result_rejected_offline() {
    let fixture = EnclaveFixture::new();
    fixture.stage_dataset(REFERENCE_WALLET);
    let commitment = pipeline::run(
        &fixture.config(Some(DATASET_FILENAME)),
        provisioned(),
        &MockScorer::new(720),
    )
    .unwrap();

    let result_path = &commitment.descriptor.deterministic_output_path;
    let mut record: AttestationRecord =
        serde_json::from_slice(&fs::read(result_path).unwrap()).unwrap();
    record.wallet = "0xsomeoneelse".to_string();
    record.input_fingerprint = format!("0x{}", "00".repeat(32));
    fs::write(result_path, serde_json::to_vec_pretty(&record).unwrap()).unwrap();

    assert!(matches!(
        verify_commitment(&commitment.descriptor_path),
        Err(VerifyError::AttestationMismatch { .. })
    ));
}

#[test]
fn test_recommitting_verified_record_is_stable() {
    let fixture = EnclaveFixture::new();
    fixture.stage_dataset(REFERENCE_WALLET);
    let commitment = pipeline::run(
        &fixture.config(Some(DATASET_FILENAME)),
        provisioned(),
        &MockScorer::new(810),
    )
    .unwrap();

    let verified = verify_commitment(&commitment.descriptor_path).unwrap();
    let elsewhere = tempfile::tempdir().unwrap();
    let copy = AttestationCommitter::new(elsewhere.path())
        .commit_record(verified.record)
        .unwrap();

    assert_eq!(
        fs::read(&copy.descriptor.deterministic_output_path).unwrap(),
        fs::read(&commitment.descriptor.deterministic_output_path).unwrap()
    );
}
