//! Test utilities for end-to-end agent scenarios

use credtrust_core::{AgentConfig, ScoreResult};
use credtrust_crypto::SecretStore;
use credtrust_scoring::{Features, ScoringFunction};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Dataset used by the reference scenario: three transactions summing to
/// 5.0 and an ETH balance of 2.0.
pub const REFERENCE_WALLET: &str = r#"{
    "address": "0x1234567890abcdef1234567890abcdef12345678",
    "privateKey": "never-read",
    "balances": {"ETH": 2.0},
    "txHistory": [{"value": 1.0}, {"value": 1.5}, {"value": 2.5}]
}"#;

pub const DATASET_FILENAME: &str = "wallet.json";

/// Initialize tracing for a test, tolerating prior initialization
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Scoring function returning a fixed result
pub struct MockScorer {
    pub result: ScoreResult,
}

impl MockScorer {
    pub fn new(score: u16) -> Self {
        Self {
            result: ScoreResult::from_score(score),
        }
    }
}

impl ScoringFunction for MockScorer {
    fn identifier(&self) -> &str {
        "mock-scorer-v1"
    }

    fn score(&self, _features: &Features) -> ScoreResult {
        self.result
    }
}

/// Builds a lookup closure over fixed key/value pairs
pub fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + Clone {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

pub fn store_from(pairs: &[(&str, &str)]) -> SecretStore {
    SecretStore::from_lookup(lookup_from(pairs))
}

/// Scratch enclave layout with an input dir and a not-yet-created output dir
pub struct EnclaveFixture {
    pub root: TempDir,
}

impl EnclaveFixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("iexec_in")).unwrap();
        Self { root }
    }

    pub fn input_dir(&self) -> PathBuf {
        self.root.path().join("iexec_in")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.path().join("iexec_out")
    }

    pub fn stage_dataset(&self, contents: &str) {
        std::fs::write(self.input_dir().join(DATASET_FILENAME), contents).unwrap();
    }

    /// Config pointing at this fixture, built through the env override path
    pub fn config(&self, dataset: Option<&str>) -> AgentConfig {
        let input = self.input_dir();
        let output = self.output_dir();
        let mut pairs = vec![
            ("IEXEC_IN", path_str(&input)),
            ("IEXEC_OUT", path_str(&output)),
        ];
        if let Some(name) = dataset {
            pairs.push(("IEXEC_DATASET_FILENAME", name.to_string()));
        }
        let borrowed: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();

        AgentConfig::default()
            .with_env_overrides(lookup_from(&borrowed))
            .unwrap()
    }

    pub fn read_output(&self, name: &str) -> serde_json::Value {
        let bytes = std::fs::read(self.output_dir().join(name)).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}

impl Default for EnclaveFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
