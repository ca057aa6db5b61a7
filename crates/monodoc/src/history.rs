//! Append-only build history
//!
//! Every run, successful or not, emits one structured record to the history
//! log as a single JSON line. Writing the record is fire-and-forget for the
//! caller: a log failure must never mask or replace the build result itself.

use std::{fs::OpenOptions, io::Write, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;

/// Run type recorded for standalone bundling runs.
pub const RUN_TYPE_STANDALONE: &str = "standalone-bundle";

/// Outcome of a build run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Success,
    Failure,
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// One history record, serialized as a single JSON line.
#[derive(Debug, Clone, Serialize)]
pub struct BuildRecord {
    /// Kind of run that produced this record.
    pub run_type: String,
    /// Local wall-clock time the record was written.
    pub timestamp: String,
    /// Overall result.
    pub result: BuildStatus,
    /// Base names of the files the run touched.
    pub files: Vec<String>,
    /// Non-fatal findings surfaced during the run.
    pub warnings: Vec<String>,
    /// Fatal errors, present on failure records.
    pub errors: Vec<String>,
    /// Free-text details for the human reading the log.
    pub details: String,
}

/// Append one record to the history log at `path`.
pub fn append_record(path: &Path, record: &BuildRecord) -> Result<()> {
    let line = serde_json::to_string(record).context("failed to serialize build record")?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open history log {}", path.display()))?;
    writeln!(file, "{line}")
        .with_context(|| format!("failed to append to history log {}", path.display()))?;
    Ok(())
}
