//! Scoring functions for the CredTrust confidential agent.
//!
//! The agent treats scoring as a pluggable black box: a pure function from a
//! [`Features`] record to a [`ScoreResult`]. Deployment profiles select an
//! implementation; every implementation honours the same contract:
//!
//! - score in `[SCORE_MIN, SCORE_MAX]`
//! - tier derived from the fixed thresholds in [`Tier::from_score`]
//! - deterministic for identical features
//!
//! [`Tier::from_score`]: credtrust_core::Tier::from_score

pub mod features;
pub mod full;
pub mod lightweight;

use credtrust_core::{ScoreResult, ScoringProfile};

pub use features::Features;
pub use full::FullScorer;
pub use lightweight::LightweightScorer;

/// Contract every scoring implementation conforms to.
pub trait ScoringFunction {
    /// Stable identifier bound into the attestation digest. Must change
    /// whenever the scoring behaviour changes.
    fn identifier(&self) -> &str;

    /// Scores a feature record.
    fn score(&self, features: &Features) -> ScoreResult;
}

/// Builds the scoring function selected by a deployment profile.
pub fn scorer_for_profile(profile: ScoringProfile) -> Box<dyn ScoringFunction> {
    let scorer: Box<dyn ScoringFunction> = match profile {
        ScoringProfile::Lightweight => Box::new(LightweightScorer),
        ScoringProfile::Full => Box::new(FullScorer),
    };
    tracing::debug!(profile = %profile, scorer = scorer.identifier(), "Scoring function selected");
    scorer
}

/// Identifiers of every built-in scoring function.
pub fn known_identifiers() -> [&'static str; 2] {
    [lightweight::IDENTIFIER, full::IDENTIFIER]
}

/// Saturating ratio of `value` to `cap`, in `[0, 1]`.
pub(crate) fn saturate(value: f64, cap: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    (value / cap).min(1.0)
}
