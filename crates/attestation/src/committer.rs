//! Attestation & Commitment Committer
//!
//! Writes exactly two artifacts into the output directory:
//!
//! 1. `result.json` - the [`AttestationRecord`]
//! 2. `computed.json` - the [`CommitmentDescriptor`] naming the absolute
//!    path of `result.json`
//!
//! The descriptor is what an external verifier fetches first, so it is only
//! written after the result file is durably in place. Each file is written
//! to a temporary sibling and renamed, so readers never observe a partial
//! file. A descriptor left over from an earlier run is removed before the
//! result is written; a failed commit therefore never leaves a descriptor
//! behind.

use credtrust_core::{ProtectedRecord, ScoreResult};
use credtrust_protected_data::DataProvenance;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::CommitError;
use crate::record::{AttestationRecord, AuthorizationMetadata};

/// File name of the deterministic result payload.
pub const RESULT_FILE: &str = "result.json";

/// File name of the commitment descriptor.
pub const DESCRIPTOR_FILE: &str = "computed.json";

/// Pointer artifact naming the deterministic result file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentDescriptor {
    #[serde(rename = "deterministic-output-path")]
    pub deterministic_output_path: PathBuf,
}

/// Outcome of a successful commit.
#[derive(Debug, Clone)]
pub struct Commitment {
    pub descriptor: CommitmentDescriptor,
    pub descriptor_path: PathBuf,
    pub record: AttestationRecord,
}

/// Writes attested results under a fixed output directory.
#[derive(Debug, Clone)]
pub struct AttestationCommitter {
    output_dir: PathBuf,
}

impl AttestationCommitter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Builds the attestation record and commits it.
    pub fn commit(
        &self,
        result: &ScoreResult,
        record: &ProtectedRecord,
        scorer_id: &str,
        provenance: &DataProvenance,
        authorization: AuthorizationMetadata,
    ) -> Result<Commitment, CommitError> {
        let attestation =
            AttestationRecord::build(result, record, scorer_id, provenance, authorization)?;
        self.commit_record(attestation)
    }

    /// Commits an already-built record.
    pub fn commit_record(&self, record: AttestationRecord) -> Result<Commitment, CommitError> {
        let payload = serde_json::to_vec_pretty(&record)?;

        fs::create_dir_all(&self.output_dir).map_err(|source| CommitError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let output_dir =
            fs::canonicalize(&self.output_dir).map_err(|source| CommitError::CreateDir {
                path: self.output_dir.clone(),
                source,
            })?;

        let result_path = output_dir.join(RESULT_FILE);
        let descriptor_path = output_dir.join(DESCRIPTOR_FILE);

        remove_stale(&descriptor_path)?;
        write_atomic(&result_path, &payload)?;
        tracing::info!(
            path = %result_path.display(),
            attestation = %record.attestation,
            "Result payload committed"
        );

        let descriptor = CommitmentDescriptor {
            deterministic_output_path: result_path,
        };
        write_atomic(&descriptor_path, &serde_json::to_vec_pretty(&descriptor)?)?;
        tracing::info!(path = %descriptor_path.display(), "Commitment descriptor written");

        Ok(Commitment {
            descriptor,
            descriptor_path,
            record,
        })
    }
}

fn remove_stale(path: &Path) -> Result<(), CommitError> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Removed stale descriptor");
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(CommitError::Write {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CommitError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let write_err = |source| CommitError::Write {
        path: path.to_path_buf(),
        source,
    };

    let written = File::create(&tmp_path)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp_path, path));

    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(source));
    }

    Ok(())
}
