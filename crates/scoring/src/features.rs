//! Feature extraction from a protected record.

use credtrust_core::ProtectedRecord;
use serde::Serialize;

/// Inputs the scoring functions operate on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Features {
    pub tx_count: u64,
    pub tx_volume: f64,
    pub eth_balance: f64,
}

impl Features {
    pub fn from_record(record: &ProtectedRecord) -> Self {
        Self {
            tx_count: record.tx_count() as u64,
            tx_volume: record.tx_volume(),
            eth_balance: record.balance("ETH"),
        }
    }
}
