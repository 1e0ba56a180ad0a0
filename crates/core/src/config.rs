//! Configuration management for the confidential agent.
//!
//! Resolution order: built-in defaults, then an optional TOML file, then
//! environment overrides supplied by the enclave runtime, then CLI flags
//! (applied by the binary). Environment access goes through a lookup
//! closure so callers and tests control exactly what is visible.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const ENV_INPUT_DIR: &str = "IEXEC_IN";
pub const ENV_OUTPUT_DIR: &str = "IEXEC_OUT";
pub const ENV_DATASET_FILENAME: &str = "IEXEC_DATASET_FILENAME";
pub const ENV_ARGS: &str = "IEXEC_ARGS";
pub const ENV_PROFILE: &str = "CREDTRUST_PROFILE";
pub const ENV_LOG_FORMAT: &str = "CREDTRUST_LOG_FORMAT";
pub const ENV_SECRETS_FILE: &str = "CREDTRUST_SECRETS_FILE";
pub const ENV_CONFIG_FILE: &str = "CREDTRUST_CONFIG";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[cfg(feature = "config-file")]
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid invocation arguments: {0}")]
    InvalidArgs(String),

    #[error("Unknown scoring profile: {0}")]
    UnknownProfile(String),

    #[error("Unknown log format: {0}")]
    UnknownLogFormat(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Deployment profile selecting a scoring function implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringProfile {
    /// Memory-constrained enclaves (SGX-class).
    #[serde(alias = "sgx")]
    Lightweight,
    /// Full-resource trust domains (TDX-class).
    #[serde(alias = "tdx")]
    Full,
}

impl ScoringProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringProfile::Lightweight => "lightweight",
            ScoringProfile::Full => "full",
        }
    }
}

impl fmt::Display for ScoringProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lightweight" | "sgx" => Ok(ScoringProfile::Lightweight),
            "full" | "tdx" => Ok(ScoringProfile::Full),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::UnknownLogFormat(other.to_string())),
        }
    }
}

/// Where the protected dataset is staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLocator {
    pub input_dir: PathBuf,
    pub dataset_filename: Option<String>,
}

impl DatasetLocator {
    /// Full path of the staged dataset, if a filename was provided.
    pub fn dataset_path(&self) -> Option<PathBuf> {
        self.dataset_filename
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(|name| self.input_dir.join(name))
    }
}

/// Arguments passed by the requester through `IEXEC_ARGS`.
///
/// Only the requester index is honoured. The scoring profile is deployment
/// configuration and cannot be chosen by the requester.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvocationArgs {
    #[serde(default)]
    secret_index: Option<i64>,
}

/// Index no requester slot maps to. Requested indices that do not fit a
/// `u32` fold onto it so they fail authorization like any unmapped index.
pub const UNMAPPED_REQUESTER_INDEX: u32 = 0;

fn requester_index_from(raw: i64) -> u32 {
    u32::try_from(raw).unwrap_or(UNMAPPED_REQUESTER_INDEX)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_profile")]
    pub profile: ScoringProfile,
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default)]
    pub dataset_filename: Option<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_requester_index")]
    pub requester_index: u32,
    #[serde(default = "default_max_dataset_bytes")]
    pub max_dataset_bytes: u64,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub secrets_file: Option<PathBuf>,
}

fn default_profile() -> ScoringProfile {
    ScoringProfile::Full
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("/iexec_in")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("/iexec_out")
}

fn default_requester_index() -> u32 {
    1
}

fn default_max_dataset_bytes() -> u64 {
    16 * 1024 * 1024
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            input_dir: default_input_dir(),
            dataset_filename: None,
            output_dir: default_output_dir(),
            requester_index: default_requester_index(),
            max_dataset_bytes: default_max_dataset_bytes(),
            log_format: LogFormat::default(),
            secrets_file: None,
        }
    }
}

impl AgentConfig {
    #[cfg(feature = "config-file")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads the file named by `CREDTRUST_CONFIG` (or `explicit`), falling
    /// back to defaults when neither is set.
    #[cfg(feature = "config-file")]
    pub fn load<F>(explicit: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = lookup(ENV_CONFIG_FILE)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let base = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        base.with_env_overrides(lookup)
    }

    /// Applies the enclave runtime's environment on top of this config.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(dir) = non_empty(ENV_INPUT_DIR) {
            self.input_dir = PathBuf::from(dir);
        }

        if let Some(dir) = non_empty(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }

        if let Some(name) = non_empty(ENV_DATASET_FILENAME) {
            self.dataset_filename = Some(name);
        }

        if let Some(profile) = non_empty(ENV_PROFILE) {
            self.profile = profile.parse()?;
        }

        if let Some(format) = non_empty(ENV_LOG_FORMAT) {
            self.log_format = format.parse()?;
        }

        if let Some(path) = non_empty(ENV_SECRETS_FILE) {
            self.secrets_file = Some(PathBuf::from(path));
        }

        if let Some(raw) = non_empty(ENV_ARGS) {
            let args: InvocationArgs = serde_json::from_str(&raw)
                .map_err(|e| ConfigError::InvalidArgs(format!("{}: {}", ENV_ARGS, e)))?;

            if let Some(raw) = args.secret_index {
                self.requester_index = requester_index_from(raw);
                if i64::from(self.requester_index) != raw {
                    tracing::warn!(
                        requested = raw,
                        "Requester index outside the addressable range"
                    );
                }
            }
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "output_dir cannot be empty".to_string(),
            ));
        }

        if self.max_dataset_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "max_dataset_bytes must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn locator(&self) -> DatasetLocator {
        DatasetLocator {
            input_dir: self.input_dir.clone(),
            dataset_filename: self.dataset_filename.clone(),
        }
    }
}
