//! Build configuration
//!
//! Configuration is resolved in layers, later layers overriding earlier ones:
//! built-in defaults, then `monodoc.toml` in the user configuration
//! directory, then `monodoc.toml` in the project directory, then an explicit
//! `--config` path. The auxiliary file list is fixed here at configuration
//! time; the pipeline never discovers files dynamically.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use etcetera::BaseStrategy;
use log::debug;
use serde::Deserialize;

/// Name of the configuration file searched for in each layer.
pub const CONFIG_FILE_NAME: &str = "monodoc.toml";

/// Fully resolved build configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host document path, relative to the project directory.
    pub host: PathBuf,
    /// Ordered auxiliary source list. Order is load order: later files may
    /// reference symbols defined by earlier ones.
    pub files: Vec<PathBuf>,
    /// Directory (relative to the project) whose script-reference tags are
    /// removed from the host during assembly.
    pub scripts_dir: String,
    /// Suffix appended to the host base name to derive the output path.
    pub output_suffix: String,
    /// Append-only build history log, relative to the project directory.
    pub history_log: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: PathBuf::from("index.html"),
            files: Vec::new(),
            scripts_dir: "js".into(),
            output_suffix: "-standalone".into(),
            history_log: PathBuf::from("build-history.jsonl"),
        }
    }
}

/// One configuration layer as read from disk. Absent keys leave the previous
/// layer's value in place.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverlay {
    host: Option<PathBuf>,
    files: Option<Vec<PathBuf>>,
    scripts_dir: Option<String>,
    output_suffix: Option<String>,
    history_log: Option<PathBuf>,
}

impl ConfigOverlay {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(files) = self.files {
            config.files = files;
        }
        if let Some(scripts_dir) = self.scripts_dir {
            config.scripts_dir = scripts_dir;
        }
        if let Some(output_suffix) = self.output_suffix {
            config.output_suffix = output_suffix;
        }
        if let Some(history_log) = self.history_log {
            config.history_log = history_log;
        }
    }
}

impl Config {
    /// Resolve the configuration for a project directory.
    ///
    /// `explicit` is the `--config` override; unlike the discovery layers it
    /// must exist and parse, since the user asked for it by name.
    pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(user_path) = user_config_path() {
            merge_layer_if_present(&mut config, &user_path)?;
        }
        merge_layer_if_present(&mut config, &project_dir.join(CONFIG_FILE_NAME))?;

        if let Some(path) = explicit {
            let overlay = read_layer(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?;
            overlay.apply(&mut config);
        }

        Ok(config)
    }

    /// Output path derived from the host path: same directory and extension,
    /// base name plus the configured suffix.
    pub fn output_path(&self) -> PathBuf {
        let stem = self
            .host
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = self
            .host
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        self.host
            .with_file_name(format!("{stem}{}{extension}", self.output_suffix))
    }
}

fn user_config_path() -> Option<PathBuf> {
    match etcetera::choose_base_strategy() {
        Ok(strategy) => Some(strategy.config_dir().join("monodoc").join(CONFIG_FILE_NAME)),
        Err(err) => {
            debug!("No user configuration directory available: {err}");
            None
        }
    }
}

fn merge_layer_if_present(config: &mut Config, path: &Path) -> Result<()> {
    if !path.is_file() {
        debug!("No config layer at {}", path.display());
        return Ok(());
    }
    let overlay =
        read_layer(path).with_context(|| format!("failed to load config file {}", path.display()))?;
    debug!("Applying config layer from {}", path.display());
    overlay.apply(config);
    Ok(())
}

fn read_layer(path: &Path) -> Result<ConfigOverlay> {
    let text = fs::read_to_string(path)?;
    let overlay = toml::from_str(&text)?;
    Ok(overlay)
}
