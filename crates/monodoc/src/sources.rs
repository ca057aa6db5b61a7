//! Auxiliary source collection
//!
//! Reads the auxiliary files named by the configuration, in configuration
//! order. Order is load order and is preserved exactly through the pipeline;
//! any unreadable file aborts the run before output exists, because a missing
//! dependency would otherwise surface only at document-load time.

use std::{
    fs,
    hash::BuildHasherDefault,
    path::{Path, PathBuf},
};

use indexmap::IndexSet;
use log::debug;
use rustc_hash::FxHasher;

use crate::errors::BundleError;

type FxIndexSet<T> = IndexSet<T, BuildHasherDefault<FxHasher>>;

/// One auxiliary file, read but not yet normalized.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Caller-supplied path, relative to the project directory.
    pub path: PathBuf,
    /// Raw file text.
    pub raw: String,
}

impl SourceUnit {
    /// Base name used for origin comments and history records.
    pub fn file_name(&self) -> String {
        base_name(&self.path)
    }
}

/// Base name of a path, falling back to its full display form when the path
/// has no final component.
pub(crate) fn base_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Result of collecting the configured auxiliary list.
#[derive(Debug)]
pub struct CollectedSources {
    /// Units in configuration order, duplicates included where they appear.
    pub units: Vec<SourceUnit>,
    /// Human-readable warnings (currently: duplicate list entries).
    pub warnings: Vec<String>,
}

/// Read every auxiliary file relative to `base_dir`, preserving order.
///
/// Duplicate paths are bundled where they appear (the list is the caller's
/// contract) but reported as warnings. Any missing or unreadable file is
/// fatal: [`BundleError::SourceUnreadable`].
pub fn collect(base_dir: &Path, paths: &[PathBuf]) -> Result<CollectedSources, BundleError> {
    let mut units = Vec::with_capacity(paths.len());
    let mut seen: FxIndexSet<&PathBuf> = FxIndexSet::default();
    let mut warnings = Vec::new();

    for path in paths {
        if !seen.insert(path) {
            warnings.push(format!(
                "auxiliary file listed more than once: {}",
                path.display()
            ));
        }
        let raw = fs::read_to_string(base_dir.join(path)).map_err(|source| {
            BundleError::SourceUnreadable {
                path: path.clone(),
                source,
            }
        })?;
        debug!("Collected {} ({} bytes)", path.display(), raw.len());
        units.push(SourceUnit {
            path: path.clone(),
            raw,
        });
    }

    Ok(CollectedSources { units, warnings })
}
