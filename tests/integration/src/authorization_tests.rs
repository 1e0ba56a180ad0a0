//! Authorization properties over randomized secrets

use crate::test_utils::*;
use credtrust_crypto::{
    keyed_digest, AuthorizationError, AuthorizationVerifier, MODEL_ACCESS_CONTEXT,
    MAX_REQUESTER_INDEX, PROOF_LEN, REQUEST_SIGNATURE_CONTEXT,
};
use rand::distributions::Alphanumeric;
use rand::Rng;

fn random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

#[test]
fn test_app_proof_deterministic_in_secret() {
    for _ in 0..16 {
        let secret = random_secret();
        let slots = [("IEXEC_APP_DEVELOPER_SECRET", secret.as_str())];
        let a = AuthorizationVerifier::new(store_from(&slots));
        let b = AuthorizationVerifier::new(store_from(&slots));

        let proof_a = a.verify_app_access().unwrap();
        let proof_b = b.verify_app_access().unwrap();
        assert_eq!(proof_a.digest.len(), PROOF_LEN);
        assert_eq!(proof_a, proof_b);
        assert_eq!(
            proof_a.digest,
            keyed_digest(secret.as_bytes(), MODEL_ACCESS_CONTEXT).unwrap()
        );
        assert!(a.verify_proof(&proof_b));
    }
}

#[test]
fn test_distinct_secrets_give_distinct_proofs() {
    let a = random_secret();
    let b = random_secret();
    assert_ne!(
        keyed_digest(a.as_bytes(), REQUEST_SIGNATURE_CONTEXT).unwrap(),
        keyed_digest(b.as_bytes(), REQUEST_SIGNATURE_CONTEXT).unwrap()
    );
}

#[test]
fn test_empty_app_secret_always_fails() {
    for store in [
        store_from(&[]),
        store_from(&[("IEXEC_APP_DEVELOPER_SECRET", "")]),
        store_from(&[("APP_SECRET", "")]),
    ] {
        let verifier = AuthorizationVerifier::new(store);
        assert_eq!(
            verifier.verify_app_access().unwrap_err(),
            AuthorizationError::AppSecretMissing
        );
    }
}

#[test]
fn test_unmapped_and_out_of_range_indistinguishable() {
    let secret = random_secret();
    let verifier = AuthorizationVerifier::new(store_from(&[
        ("IEXEC_APP_DEVELOPER_SECRET", "k1"),
        ("IEXEC_REQUESTER_SECRET_2", secret.as_str()),
    ]));

    assert!(verifier.sign_on_behalf_of(2).is_ok());

    for index in [0, 1, MAX_REQUESTER_INDEX, MAX_REQUESTER_INDEX + 1, u32::MAX] {
        let err = verifier.sign_on_behalf_of(index).unwrap_err();
        assert_eq!(err, AuthorizationError::RequesterNotAuthorized { index });
        // Rendered message carries no hint of which indices are mapped
        assert_eq!(
            err.to_string(),
            format!("Requester secret {} not authorized", index)
        );
    }
}
