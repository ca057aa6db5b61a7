//! Bundling pipeline orchestration
//!
//! Runs the stages in sequence: collect sources, normalize each unit,
//! extract the inline main script, assemble the standalone document, stamp
//! the build info, persist the output. The original host document is never
//! opened for writing; the output file and the history record are each
//! written exactly once, after all transformation completes.

use std::{fs, path::PathBuf};

use anyhow::Result;
use chrono::Local;
use log::{debug, info, warn};

use crate::{
    assembler,
    config::Config,
    errors::BundleError,
    extractor,
    history::{self, BuildRecord, BuildStatus, RUN_TYPE_STANDALONE},
    normalizer, sources, stamp,
};

/// What a successful run produced, for the CLI summary.
#[derive(Debug)]
pub struct BundleSummary {
    /// Path the standalone document was written to.
    pub output_path: PathBuf,
    /// Number of auxiliary files merged.
    pub files_merged: usize,
    /// Whether an inline module-typed main script was found in the host.
    pub main_script_found: bool,
    /// Timestamp written into the build-info annotation, when one existed.
    pub stamped_timestamp: Option<String>,
}

/// Drives one standalone-bundling run.
#[derive(Debug)]
pub struct BundleOrchestrator {
    config: Config,
    project_dir: PathBuf,
    output_override: Option<PathBuf>,
}

impl BundleOrchestrator {
    pub fn new(config: Config, project_dir: PathBuf) -> Self {
        Self {
            config,
            project_dir,
            output_override: None,
        }
    }

    /// Write the output to `path` instead of the derived sibling path.
    #[must_use]
    pub fn with_output_override(mut self, path: Option<PathBuf>) -> Self {
        self.output_override = path;
        self
    }

    /// Run the pipeline and record the outcome in the history log.
    ///
    /// The history record is emitted after every run, success or failure;
    /// failing to write it is logged and never replaces the build result.
    pub fn run(&self) -> Result<BundleSummary> {
        let mut warnings = Vec::new();
        let outcome = self.execute(&mut warnings);

        let record = match &outcome {
            Ok(summary) => self.build_record(
                BuildStatus::Success,
                warnings,
                Vec::new(),
                format!(
                    "merged {} auxiliary files into {}",
                    summary.files_merged,
                    summary.output_path.display()
                ),
            ),
            Err(err) => self.build_record(
                BuildStatus::Failure,
                warnings,
                vec![format!("{err:#}")],
                "standalone bundling failed".to_owned(),
            ),
        };
        let log_path = self.project_dir.join(&self.config.history_log);
        if let Err(log_err) = history::append_record(&log_path, &record) {
            warn!("Could not record build history: {log_err:#}");
        }

        outcome
    }

    fn execute(&self, warnings: &mut Vec<String>) -> Result<BundleSummary> {
        let host_path = self.project_dir.join(&self.config.host);
        info!("Starting standalone bundle for {}", host_path.display());

        let host_text =
            fs::read_to_string(&host_path).map_err(|source| BundleError::SourceUnreadable {
                path: self.config.host.clone(),
                source,
            })?;

        debug!(
            "Stage 1: collecting {} auxiliary sources",
            self.config.files.len()
        );
        let collected = sources::collect(&self.project_dir, &self.config.files)?;
        for warning in &collected.warnings {
            warn!("{warning}");
        }
        warnings.extend(collected.warnings);

        debug!("Stage 2: normalizing auxiliary sources");
        let units = collected
            .units
            .iter()
            .map(normalizer::normalize_unit)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Stage 3: extracting inline main script");
        let main_script = extractor::extract_main_script(&host_text);
        let main_script_found = !main_script.is_empty();
        if !main_script_found {
            info!("No inline module script found in host document");
        }

        debug!("Stage 4: assembling standalone document");
        let assembled =
            assembler::assemble(&host_text, &units, &main_script, &self.config.scripts_dir)?;

        debug!("Stage 5: stamping build info");
        let timestamp = stamp::format_build_timestamp(Local::now());
        let stamped_timestamp = if stamp::has_build_info(&assembled) {
            Some(timestamp.clone())
        } else {
            info!("No build-info annotation present; leaving document as assembled");
            None
        };
        let final_text = stamp::stamp_build_info(&assembled, &timestamp);

        let output_path = self.output_path();
        fs::write(&output_path, &final_text).map_err(|source| BundleError::WriteFailure {
            path: output_path.clone(),
            source,
        })?;
        info!("Wrote standalone document to {}", output_path.display());

        Ok(BundleSummary {
            output_path,
            files_merged: units.len(),
            main_script_found,
            stamped_timestamp,
        })
    }

    fn output_path(&self) -> PathBuf {
        self.output_override
            .clone()
            .unwrap_or_else(|| self.project_dir.join(self.config.output_path()))
    }

    fn build_record(
        &self,
        result: BuildStatus,
        warnings: Vec<String>,
        errors: Vec<String>,
        details: String,
    ) -> BuildRecord {
        let mut files = vec![sources::base_name(&self.config.host)];
        files.extend(self.config.files.iter().map(|path| sources::base_name(path)));
        BuildRecord {
            run_type: RUN_TYPE_STANDALONE.to_owned(),
            timestamp: stamp::format_build_timestamp(Local::now()),
            result,
            files,
            warnings,
            errors,
            details,
        }
    }
}
