//! Command-line overrides and final configuration resolution.
//!
//! Precedence, lowest to highest: defaults, TOML file, environment, CLI.

use clap::Args;
use credtrust_core::{AgentConfig, ScoringProfile};
use std::path::{Path, PathBuf};

use crate::error::AgentError;

/// Operator-supplied flags layered over file and environment configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct RunOverrides {
    #[arg(long, global = true)]
    pub input_dir: Option<PathBuf>,
    #[arg(long, global = true)]
    pub dataset_filename: Option<String>,
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,
    #[arg(long, global = true)]
    pub requester_index: Option<u32>,
    /// Scoring profile: lightweight (sgx) or full (tdx)
    #[arg(long, global = true)]
    pub profile: Option<String>,
}

impl RunOverrides {
    pub fn apply(&self, mut config: AgentConfig) -> Result<AgentConfig, AgentError> {
        if let Some(dir) = &self.input_dir {
            config.input_dir = dir.clone();
        }
        if let Some(name) = &self.dataset_filename {
            config.dataset_filename = Some(name.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(index) = self.requester_index {
            config.requester_index = index;
        }
        if let Some(profile) = &self.profile {
            config.profile = profile.parse::<ScoringProfile>()?;
        }
        Ok(config)
    }
}

/// Loads the config file and environment through `lookup`, then applies `overrides`.
pub fn resolve_config<F>(
    config_path: Option<&Path>,
    lookup: F,
    overrides: &RunOverrides,
) -> Result<AgentConfig, AgentError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = AgentConfig::load(config_path, lookup)?;
    overrides.apply(config)
}
