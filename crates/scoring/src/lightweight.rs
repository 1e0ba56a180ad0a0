//! Memory-optimized scoring for constrained enclaves.
//!
//! Linear blend of saturated features; no allocation, no model weights.

use credtrust_core::{ScoreResult, SCORE_MAX, SCORE_MIN};

use crate::{saturate, Features, ScoringFunction};

pub const IDENTIFIER: &str = "credtrust-lightweight-v1";

const TX_COUNT_CAP: f64 = 1_000.0;
const TX_VOLUME_CAP: f64 = 1_000.0;
const ETH_BALANCE_CAP: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct LightweightScorer;

impl ScoringFunction for LightweightScorer {
    fn identifier(&self) -> &str {
        IDENTIFIER
    }

    fn score(&self, features: &Features) -> ScoreResult {
        let probability = 0.5 * saturate(features.tx_count as f64, TX_COUNT_CAP)
            + 0.3 * saturate(features.tx_volume, TX_VOLUME_CAP)
            + 0.2 * saturate(features.eth_balance, ETH_BALANCE_CAP);

        let span = (SCORE_MAX - SCORE_MIN) as f64;
        ScoreResult::from_raw(SCORE_MIN as f64 + probability * span)
    }
}
