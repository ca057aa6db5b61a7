//! Main-script extraction from the host document
//!
//! The host carries the application entry point as one inline module-typed
//! script block. Extraction takes the first such block (non-greedy to the
//! nearest closing tag) and removes its dependency declarations, including
//! the multi-line forms the whole-line rule cannot express.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalizer::strip_import_lines;

/// Inline module-typed script block. The recognized shape is the fixed,
/// double-quoted `<script type="module">` form; attribute variations are
/// outside the no-parse contract.
pub(crate) static MODULE_SCRIPT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<script[ \t]+type="module"[ \t]*>(.*?)</script>"#)
        .expect("module-script pattern is valid")
});

/// Symbol-list dependency declaration, tolerated across line breaks
/// (`import {\n  A,\n  B\n} from './x.js';`).
static MULTILINE_SYMBOL_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s*\{[^}]*\}\s*from\s*['"][^'"]+['"][ \t]*;?"#)
        .expect("multi-line symbol import pattern is valid")
});

/// Bare import-for-side-effect statement (`import './x.js';`).
static SIDE_EFFECT_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*import\s*['"][^'"\n]+['"][ \t]*;?[ \t]*\r?\n?"#)
        .expect("side-effect import pattern is valid")
});

/// Extract the main script from the host document.
///
/// Returns the empty string when no inline module script exists; a host with
/// no entry-point block is valid and simply yields an empty main section.
/// Dependency declarations are removed in three passes: the whole-line rule
/// first, then the two multi-line forms it cannot express.
pub fn extract_main_script(host_text: &str) -> String {
    let Some(captures) = MODULE_SCRIPT_RE.captures(host_text) else {
        return String::new();
    };
    let body = &captures[1];

    let body = strip_import_lines(body);
    let body = MULTILINE_SYMBOL_IMPORT_RE.replace_all(&body, "");
    let body = SIDE_EFFECT_IMPORT_RE.replace_all(&body, "");
    body.into_owned()
}
