//! Core domain types shared by every stage of the agent pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CoreError, Result};

/// Lowest score a scoring function may produce.
pub const SCORE_MIN: u16 = 300;

/// Highest score a scoring function may produce.
pub const SCORE_MAX: u16 = 850;

/// Discrete credit tier derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    A,
    B,
    C,
    D,
}

impl Tier {
    /// Maps a score onto its tier. Thresholds are inclusive lower bounds.
    pub fn from_score(score: u16) -> Self {
        match score {
            s if s >= 750 => Tier::A,
            s if s >= 650 => Tier::B,
            s if s >= 550 => Tier::C,
            _ => Tier::D,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a scoring function.
///
/// Built through [`ScoreResult::from_raw`] or [`ScoreResult::from_score`], both
/// of which keep the score inside `[SCORE_MIN, SCORE_MAX]` and derive the tier
/// from it. Deserialized values should be checked with [`ScoreResult::is_consistent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u16,
    pub tier: Tier,
}

impl ScoreResult {
    /// Clamps an unbounded model output into the score range.
    pub fn from_raw(raw: f64) -> Self {
        let clamped = if raw.is_nan() {
            SCORE_MIN as f64
        } else {
            raw.clamp(SCORE_MIN as f64, SCORE_MAX as f64)
        };
        Self::from_score(clamped.round() as u16)
    }

    pub fn from_score(score: u16) -> Self {
        let score = score.clamp(SCORE_MIN, SCORE_MAX);
        Self {
            score,
            tier: Tier::from_score(score),
        }
    }

    /// True when the score is in range and the tier matches the thresholds.
    pub fn is_consistent(&self) -> bool {
        (SCORE_MIN..=SCORE_MAX).contains(&self.score) && Tier::from_score(self.score) == self.tier
    }
}

/// A single entry of the wallet's transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub value: f64,
}

/// Decoded protected payload: the wallet and its confidential history.
///
/// Balances are kept in a `BTreeMap` so the canonical serialization used for
/// fingerprinting is independent of the order fields arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedRecord {
    pub address: String,
    #[serde(default)]
    pub balances: BTreeMap<String, f64>,
    #[serde(default)]
    pub tx_history: Vec<Transaction>,
}

impl ProtectedRecord {
    /// Balance held in `currency`, zero when absent.
    pub fn balance(&self, currency: &str) -> f64 {
        self.balances.get(currency).copied().unwrap_or(0.0)
    }

    pub fn tx_count(&self) -> usize {
        self.tx_history.len()
    }

    /// Sum of all transaction values.
    pub fn tx_volume(&self) -> f64 {
        self.tx_history.iter().map(|tx| tx.value).sum()
    }

    /// Checks the structural invariants a decoded record must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(CoreError::InvalidRecord {
                field: "address".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        for (currency, amount) in &self.balances {
            if !amount.is_finite() || *amount < 0.0 {
                return Err(CoreError::InvalidRecord {
                    field: format!("balances.{}", currency),
                    reason: format!("must be a finite non-negative amount (got {})", amount),
                });
            }
        }

        for (index, tx) in self.tx_history.iter().enumerate() {
            if !tx.value.is_finite() || tx.value < 0.0 {
                return Err(CoreError::InvalidRecord {
                    field: format!("txHistory[{}].value", index),
                    reason: format!("must be a finite non-negative value (got {})", tx.value),
                });
            }
        }

        Ok(())
    }

    /// Deterministic byte encoding used for fingerprinting.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
