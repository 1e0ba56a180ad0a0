//! Secret Store - tiered classification of provisioned secrets.
//!
//! The enclave runtime provisions secrets as key/value pairs. This module is
//! the only place in the agent that reads them. Each value is classified into
//! a [`SecretTier`]:
//!
//! - one application secret, provisioned by the application owner
//! - up to [`MAX_REQUESTER_INDEX`] requester secrets, indexed from 1
//!
//! # Security Model
//!
//! - The scan is bounded: only the named slots are inspected
//! - Empty values are absent, never empty secrets
//! - Secret bytes are zeroized on drop and redacted from `Debug`
//! - Only presence flags and counts are ever logged

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Highest requester secret index the store will look up.
pub const MAX_REQUESTER_INDEX: u32 = 10;

/// Slot name of the application secret.
pub const APP_SECRET_KEY: &str = "IEXEC_APP_DEVELOPER_SECRET";

/// Older slot name still honoured when the primary slot is unset.
pub const LEGACY_APP_SECRET_KEY: &str = "APP_SECRET";

/// Prefix of the indexed requester secret slots (`IEXEC_REQUESTER_SECRET_1` ...).
pub const REQUESTER_SECRET_PREFIX: &str = "IEXEC_REQUESTER_SECRET_";

/// Errors raised while reading a secret source.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Failed to read secrets file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse secrets file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Secret slot '{key}' must be a string value")]
    InvalidValue { key: String },
}

/// Named tier a secret belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SecretTier {
    AppSecret,
    RequesterSecret(u32),
}

impl SecretTier {
    /// Requester tier for `index`, or `None` outside `1..=MAX_REQUESTER_INDEX`.
    pub fn requester(index: u32) -> Option<Self> {
        (1..=MAX_REQUESTER_INDEX)
            .contains(&index)
            .then_some(SecretTier::RequesterSecret(index))
    }

    /// Provisioning slot name for this tier.
    pub fn slot_name(&self) -> String {
        match self {
            SecretTier::AppSecret => APP_SECRET_KEY.to_string(),
            SecretTier::RequesterSecret(index) => format!("{}{}", REQUESTER_SECRET_PREFIX, index),
        }
    }
}

impl fmt::Display for SecretTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretTier::AppSecret => f.write_str("app"),
            SecretTier::RequesterSecret(index) => write!(f, "requester-{}", index),
        }
    }
}

/// Opaque secret bytes, wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    /// Wraps a provisioned value. Empty values are rejected as absent.
    fn new(value: String) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        Some(Self(value.into_bytes()))
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretBytes(<redacted>)")
    }
}

/// Immutable mapping from [`SecretTier`] to secret bytes.
pub struct SecretStore {
    app_secret: Option<SecretBytes>,
    requester_secrets: BTreeMap<u32, SecretBytes>,
}

impl SecretStore {
    /// Builds a store by scanning the bounded set of slots through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_secret = lookup(APP_SECRET_KEY)
            .and_then(SecretBytes::new)
            .or_else(|| lookup(LEGACY_APP_SECRET_KEY).and_then(SecretBytes::new));

        let requester_secrets: BTreeMap<u32, SecretBytes> = (1..=MAX_REQUESTER_INDEX)
            .filter_map(|index| {
                let slot = SecretTier::RequesterSecret(index).slot_name();
                lookup(&slot)
                    .and_then(SecretBytes::new)
                    .map(|secret| (index, secret))
            })
            .collect();

        let store = Self {
            app_secret,
            requester_secrets,
        };

        tracing::info!(
            app_secret_present = store.has_app_secret(),
            requester_secrets = store.requester_secret_count(),
            "Secret store initialized"
        );

        store
    }

    /// Builds a store from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a store from a TOML secrets file layered under `lookup`.
    ///
    /// A slot set (non-empty) in `lookup` takes precedence over the file.
    pub fn from_file_and_lookup<P, F>(path: P, lookup: F) -> Result<Self, SecretError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let content = std::fs::read_to_string(path)?;
        let file_values = parse_secrets_document(&content)?;

        Ok(Self::from_lookup(|key| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .or_else(|| file_values.get(key).cloned())
        }))
    }

    pub fn has_app_secret(&self) -> bool {
        self.app_secret.is_some()
    }

    pub fn app_secret(&self) -> Option<&[u8]> {
        self.app_secret.as_ref().map(SecretBytes::expose)
    }

    /// Secret for `index`. Indices outside the bounded range are always absent.
    pub fn requester_secret(&self, index: u32) -> Option<&[u8]> {
        SecretTier::requester(index)?;
        self.requester_secrets.get(&index).map(SecretBytes::expose)
    }

    pub fn requester_secret_count(&self) -> usize {
        self.requester_secrets.len()
    }

    /// Tiers that hold a secret, app tier first.
    pub fn tiers(&self) -> Vec<SecretTier> {
        self.app_secret
            .as_ref()
            .map(|_| SecretTier::AppSecret)
            .into_iter()
            .chain(
                self.requester_secrets
                    .keys()
                    .map(|index| SecretTier::RequesterSecret(*index)),
            )
            .collect()
    }
}

impl fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretStore")
            .field("app_secret_present", &self.has_app_secret())
            .field("requester_secrets", &self.requester_secret_count())
            .finish()
    }
}

fn parse_secrets_document(content: &str) -> Result<HashMap<String, String>, SecretError> {
    let table: toml::Table = toml::from_str(content)?;
    table
        .into_iter()
        .map(|(key, value)| match value {
            toml::Value::String(secret) => Ok((key, secret)),
            _ => Err(SecretError::InvalidValue { key }),
        })
        .collect()
}
