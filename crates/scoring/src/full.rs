//! Full-resource scoring for trust domains without tight memory limits.
//!
//! Weighted log-scaled features, so early activity moves the score more
//! than the same increment on an already large wallet.

use credtrust_core::{ScoreResult, SCORE_MAX, SCORE_MIN};

use crate::{saturate, Features, ScoringFunction};

pub const IDENTIFIER: &str = "credtrust-full-v1";

const ACTIVITY_WEIGHT: f64 = 0.25;
const VOLUME_WEIGHT: f64 = 0.30;
const BALANCE_WEIGHT: f64 = 0.45;

const TX_COUNT_CAP: f64 = 1_000.0;
const TX_VOLUME_CAP: f64 = 10_000.0;
const ETH_BALANCE_CAP: f64 = 100.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct FullScorer;

fn log_scaled(value: f64, cap: f64) -> f64 {
    saturate(value.max(0.0).ln_1p(), cap.ln_1p())
}

impl ScoringFunction for FullScorer {
    fn identifier(&self) -> &str {
        IDENTIFIER
    }

    fn score(&self, features: &Features) -> ScoreResult {
        let blend = ACTIVITY_WEIGHT * log_scaled(features.tx_count as f64, TX_COUNT_CAP)
            + VOLUME_WEIGHT * log_scaled(features.tx_volume, TX_VOLUME_CAP)
            + BALANCE_WEIGHT * log_scaled(features.eth_balance, ETH_BALANCE_CAP);

        let span = (SCORE_MAX - SCORE_MIN) as f64;
        ScoreResult::from_raw(SCORE_MIN as f64 + blend * span)
    }
}
