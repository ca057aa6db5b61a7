//! Standalone document assembly
//!
//! Takes the host text, the normalized auxiliary units in load order, and the
//! extracted main script, and produces the standalone document: module script
//! blocks and auxiliary reference tags removed, one plain inline script block
//! holding the merged body inserted immediately before the closing body tag.

use regex::Regex;

use crate::{errors::BundleError, extractor::MODULE_SCRIPT_RE, normalizer::NormalizedUnit};

/// Marker comment preceding the extracted main script in the merged body.
const MAIN_MARKER: &str = "// ---- main application ----";

/// Assemble the standalone document.
///
/// The merged body keeps the unit order exactly as given; each unit is
/// preceded by a generated comment naming its origin file so the flattened
/// output stays attributable. Fails with
/// [`BundleError::AssemblyTargetMissing`] when the host has no closing body
/// tag: a malformed host must never be passed through as a "successful"
/// build that is not actually standalone.
pub fn assemble(
    host_text: &str,
    units: &[NormalizedUnit],
    main_script: &str,
    scripts_dir: &str,
) -> Result<String, BundleError> {
    let without_modules = MODULE_SCRIPT_RE.replace_all(host_text, "");
    let residual = script_reference_re(scripts_dir)
        .replace_all(&without_modules, "")
        .into_owned();

    let block = format!("<script>\n{}\n</script>\n", merged_body(units, main_script));

    // The last closing body tag anchors insertion; an earlier literal
    // `</body>` inside script text must not capture it.
    let anchor = residual
        .rfind("</body>")
        .ok_or(BundleError::AssemblyTargetMissing)?;

    let mut output = String::with_capacity(residual.len() + block.len());
    output.push_str(&residual[..anchor]);
    output.push_str(&block);
    output.push_str(&residual[anchor..]);
    Ok(output)
}

/// Origin comment generated in front of each merged unit.
pub fn origin_comment(file_name: &str) -> String {
    format!("// ---- {file_name} ----")
}

/// Reference tags pointing under the auxiliary-script directory, e.g.
/// `<script src="js/store.js"></script>`, with or without a leading `./`.
fn script_reference_re(scripts_dir: &str) -> Regex {
    let dir = regex::escape(scripts_dir);
    Regex::new(&format!(
        r#"[ \t]*<script[ \t]+src="(?:\./)?{dir}/[^"]*"[^>]*>\s*</script>[ \t]*\r?\n?"#
    ))
    .expect("script reference pattern is valid")
}

fn merged_body(units: &[NormalizedUnit], main_script: &str) -> String {
    let mut body = String::new();
    for unit in units {
        body.push_str(&origin_comment(&unit.file_name()));
        body.push('\n');
        body.push_str(unit.text.trim_end());
        body.push_str("\n\n");
    }
    body.push_str(MAIN_MARKER);
    body.push('\n');
    body.push_str(main_script.trim());
    body
}
