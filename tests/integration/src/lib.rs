//! End-to-end scenarios for the confidential agent
//!
//! This test suite validates:
//! - The full verify, load, score, commit pipeline against a scratch output dir
//! - Fail-closed authorization and untouched output on early failures
//! - Synthetic degradation disclosed in the result payload
//! - Offline verification of committed artifacts

pub mod test_utils;

#[cfg(test)]
mod agent_pipeline_tests;

#[cfg(test)]
mod authorization_tests;

#[cfg(test)]
mod commitment_tests;
