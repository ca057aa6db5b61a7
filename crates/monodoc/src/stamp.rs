//! Build-info stamping
//!
//! The host document may carry a cosmetic `(빌드정보: …)` annotation; after
//! assembly it is rewritten with the fresh build timestamp. The annotation
//! being absent is fine, the stamp is informational only and independent of
//! the script merge.

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;

static BUILD_INFO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(빌드정보:[^)]*\)").expect("build-info pattern is valid"));

/// Replace the content of the build-info annotation with `timestamp`.
/// Returns the text unchanged when no annotation exists.
pub fn stamp_build_info(text: &str, timestamp: &str) -> String {
    let replacement = format!("(빌드정보: {timestamp})");
    BUILD_INFO_RE.replace(text, replacement.as_str()).into_owned()
}

/// Whether the text carries a build-info annotation at all.
pub fn has_build_info(text: &str) -> bool {
    BUILD_INFO_RE.is_match(text)
}

/// Human-readable local timestamp written into the annotation.
pub fn format_build_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}
