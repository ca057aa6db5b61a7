//! Module-syntax normalization for auxiliary sources
//!
//! Strips the module-system surface of one auxiliary file (export markers,
//! re-export lists, dependency declarations, the trailing environment guard)
//! so the remaining text is valid as a plain, non-modular script. The rules
//! are textual, not syntactic: each one is a named pattern over whole lines
//! or whole constructs, and none of them skips occurrences inside string or
//! comment literals. Keeping every rewrite behind its own named rule keeps a
//! later upgrade to a real parse step a local change.

use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{errors::BundleError, sources::SourceUnit};

/// `export class Foo` / `export default class Foo` at the start of a line.
/// Only the marker is removed; the class declaration stays in place.
static EXPORT_CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([ \t]*)export[ \t]+(?:default[ \t]+)?class\b")
        .expect("export-class pattern is valid")
});

/// Standalone re-export list (`export { A, B };`) with no accompanying
/// declaration, matched as a whole line.
static EXPORT_LIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*export[ \t]*\{[^}\n]*\}[ \t]*;?[ \t]*(?:\r?\n|\z)")
        .expect("export-list pattern is valid")
});

/// Whole-line dependency declaration (`import … from '…';`), including the
/// trailing statement terminator and line break, so surrounding lines are
/// left untouched.
static IMPORT_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*import\b[^\n]*\bfrom[ \t]*['"][^'"\n]+['"][ \t]*;?[ \t]*(?:\r?\n|\z)"#)
        .expect("import-line pattern is valid")
});

/// Opening guard of an environment-conditional export block
/// (`if (typeof module !== 'undefined' …) {`). Used to count candidates
/// before anything is removed.
static ENV_GUARD_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*if[ \t]*\([ \t]*typeof[ \t]+module[ \t]*!==[ \t]*['"]undefined['"]"#)
        .expect("env-guard opening pattern is valid")
});

/// The full guard block: the opening guard through the first line holding
/// only a closing brace. Positional and brittle by construction; well-formed
/// auxiliary files carry at most one such block, as their last construct.
static ENV_GUARD_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?ms)^[ \t]*if[ \t]*\([ \t]*typeof[ \t]+module[ \t]*!==[ \t]*['"]undefined['"].*?\{.*?^[ \t]*\}[ \t]*;?[ \t]*\r?\n?"#,
    )
    .expect("env-guard block pattern is valid")
});

/// One auxiliary file after normalization, ready for assembly.
#[derive(Debug, Clone)]
pub struct NormalizedUnit {
    /// Origin path, kept for the generated origin comment.
    pub path: PathBuf,
    /// Normalized text, computed once and immutable afterwards.
    pub text: String,
}

impl NormalizedUnit {
    /// Base name used for the origin comment in the merged output.
    pub fn file_name(&self) -> String {
        crate::sources::base_name(&self.path)
    }
}

/// Strip module-system syntax from one auxiliary file's text.
///
/// Absence of any pattern is a no-op; the only failure is more than one
/// environment-guard candidate, which would make the positional removal
/// ambiguous ([`BundleError::AmbiguousEnvGuard`]).
pub fn normalize(text: &str) -> Result<String, BundleError> {
    let text = strip_export_class(text);
    let text = strip_export_lists(&text);
    let text = strip_import_lines(&text);
    strip_env_guard(&text)
}

/// Normalize a collected [`SourceUnit`] into an assembly-ready unit.
pub fn normalize_unit(unit: &SourceUnit) -> Result<NormalizedUnit, BundleError> {
    let text = normalize(&unit.raw)?;
    Ok(NormalizedUnit {
        path: unit.path.clone(),
        text,
    })
}

/// Rule 1: drop the `export` marker in front of a class declaration. The
/// class itself stays; after merging there is no cross-file export to serve.
fn strip_export_class(text: &str) -> String {
    EXPORT_CLASS_RE.replace_all(text, "${1}class").into_owned()
}

/// Rule 2: drop standalone `export { … };` statements.
fn strip_export_lists(text: &str) -> String {
    EXPORT_LIST_RE.replace_all(text, "").into_owned()
}

/// Rule 3: drop whole-line `import … from '…';` declarations.
pub(crate) fn strip_import_lines(text: &str) -> String {
    IMPORT_LINE_RE.replace_all(text, "").into_owned()
}

/// Rule 4: drop the single trailing environment-conditional export block.
fn strip_env_guard(text: &str) -> Result<String, BundleError> {
    let count = ENV_GUARD_OPEN_RE.find_iter(text).count();
    match count {
        0 => Ok(text.to_owned()),
        1 => Ok(ENV_GUARD_BLOCK_RE.replace(text, "").into_owned()),
        _ => Err(BundleError::AmbiguousEnvGuard { count }),
    }
}
