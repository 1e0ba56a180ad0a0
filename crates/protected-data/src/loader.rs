//! Protected Data Loader
//!
//! Resolves the dataset staged by the enclave runtime and decodes it into a
//! [`ProtectedRecord`]. Decoding failures never abort the pipeline: the
//! loader substitutes a fixed synthetic record and reports that it did so
//! through [`DataProvenance`], which the committer writes into the result.

use credtrust_core::{DatasetLocator, ProtectedRecord, Transaction};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;

use crate::error::DataIntegrityError;

/// Address carried by the synthetic record.
pub const SYNTHETIC_ADDRESS: &str = "0xSyntheticWallet";

const SYNTHETIC_ETH_BALANCE: f64 = 1.25;
const SYNTHETIC_TX_COUNT: usize = 50;
const SYNTHETIC_TX_VALUE: f64 = 0.5;

/// Where the record handed to the scoring function came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DataProvenance {
    /// Decoded from the staged protected dataset.
    Protected,
    /// Substituted because the protected dataset could not be used.
    Synthetic { reason: String },
}

impl DataProvenance {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, DataProvenance::Synthetic { .. })
    }

    pub fn synthetic_reason(&self) -> Option<&str> {
        match self {
            DataProvenance::Synthetic { reason } => Some(reason),
            DataProvenance::Protected => None,
        }
    }
}

/// A record together with its provenance flag.
#[derive(Debug, Clone)]
pub struct LoadedRecord {
    pub record: ProtectedRecord,
    pub provenance: DataProvenance,
}

/// Fixed, clearly-marked stand-in used when protected data is unavailable.
pub fn synthetic_record() -> ProtectedRecord {
    ProtectedRecord {
        address: SYNTHETIC_ADDRESS.to_string(),
        balances: BTreeMap::from([("ETH".to_string(), SYNTHETIC_ETH_BALANCE)]),
        tx_history: vec![
            Transaction {
                value: SYNTHETIC_TX_VALUE
            };
            SYNTHETIC_TX_COUNT
        ],
    }
}

/// Reads and decodes protected datasets staged for this invocation.
#[derive(Debug, Clone)]
pub struct ProtectedDataLoader {
    max_dataset_bytes: u64,
}

impl ProtectedDataLoader {
    pub fn new(max_dataset_bytes: u64) -> Self {
        Self { max_dataset_bytes }
    }

    /// Loads the record named by `locator`, degrading to the synthetic
    /// record on any failure.
    pub fn load(&self, locator: &DatasetLocator) -> LoadedRecord {
        match self.try_load(locator) {
            Ok(record) => {
                tracing::info!(
                    transactions = record.tx_count(),
                    currencies = record.balances.len(),
                    "Protected dataset decoded"
                );
                LoadedRecord {
                    record,
                    provenance: DataProvenance::Protected,
                }
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "Protected dataset unusable, substituting synthetic record"
                );
                LoadedRecord {
                    record: synthetic_record(),
                    provenance: DataProvenance::Synthetic {
                        reason: err.to_string(),
                    },
                }
            }
        }
    }

    /// Strict variant of [`load`](Self::load) that surfaces the failure.
    pub fn try_load(&self, locator: &DatasetLocator) -> Result<ProtectedRecord, DataIntegrityError> {
        let path = locator
            .dataset_path()
            .ok_or(DataIntegrityError::DatasetNotProvided)?;

        let file = File::open(&path).map_err(|source| DataIntegrityError::Unreadable {
            path: path.clone(),
            source,
        })?;

        // Read one byte past the limit so oversized inputs are detected
        // without buffering them entirely.
        let mut bytes = Vec::new();
        file.take(self.max_dataset_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|source| DataIntegrityError::Unreadable {
                path: path.clone(),
                source,
            })?;

        if bytes.len() as u64 > self.max_dataset_bytes {
            return Err(DataIntegrityError::TooLarge {
                limit: self.max_dataset_bytes,
            });
        }

        decode_record(&bytes)
    }
}

/// Decodes and validates a staged dataset.
pub fn decode_record(bytes: &[u8]) -> Result<ProtectedRecord, DataIntegrityError> {
    let record: ProtectedRecord = serde_json::from_slice(bytes)?;
    record
        .validate()
        .map_err(|e| DataIntegrityError::Invalid(e.to_string()))?;
    Ok(record)
}
