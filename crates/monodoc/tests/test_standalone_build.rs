use std::{fs, path::PathBuf};

use monodoc::{config::Config, errors::BundleError, orchestrator::BundleOrchestrator};
use tempfile::TempDir;

const HOST: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>demo (빌드정보: never)</title>
<script src="js/store.js"></script>
</head>
<body>
<div id="app"></div>
<script type="module">import {X} from './js/store.js'; X.run();</script>
</body>
</html>
"#;

fn project_with_host(host: &str) -> TempDir {
    let temp_dir = TempDir::new().expect("temp dir");
    fs::create_dir_all(temp_dir.path().join("js")).expect("create js dir");
    fs::write(temp_dir.path().join("index.html"), host).expect("write host");
    temp_dir
}

fn config_with_files(files: &[&str]) -> Config {
    Config {
        files: files.iter().map(PathBuf::from).collect(),
        ..Default::default()
    }
}

/// Cut the volatile build-info annotation out so outputs can be compared
/// across runs.
fn without_build_info(text: &str) -> String {
    let Some(start) = text.find("(빌드정보:") else {
        return text.to_owned();
    };
    let end = text[start..].find(')').map_or(text.len(), |i| start + i + 1);
    format!("{}{}", &text[..start], &text[end..])
}

#[test]
fn test_bundle_flattens_module_syntax() {
    let temp_dir = project_with_host(HOST);
    fs::write(
        temp_dir.path().join("js/store.js"),
        "export class X { run(){return 1;} }\n",
    )
    .expect("write store.js");

    let config = config_with_files(&["js/store.js"]);
    let summary = BundleOrchestrator::new(config, temp_dir.path().to_path_buf())
        .run()
        .expect("bundle should succeed");

    assert_eq!(summary.files_merged, 1);
    assert!(summary.main_script_found, "host carries an inline module script");
    assert!(summary.stamped_timestamp.is_some(), "host carries a build-info annotation");

    let output = fs::read_to_string(temp_dir.path().join("index-standalone.html"))
        .expect("standalone output exists");
    assert!(
        output.contains("class X { run(){return 1;} }"),
        "class declaration survives without its export marker"
    );
    assert!(output.contains("X.run();"), "main script call survives");
    assert!(!output.contains("import"), "no dependency declarations remain");
    assert!(!output.contains("export"), "no export markers remain");
    assert!(!output.contains("type=\"module\""), "no module script blocks remain");
    assert!(!output.contains("src=\"js/"), "no auxiliary reference tags remain");
    assert!(
        fs::read_to_string(temp_dir.path().join("index.html")).expect("original host") == HOST,
        "original host document is untouched"
    );
}

#[test]
fn test_merged_sections_keep_configured_order() {
    let temp_dir = project_with_host(HOST);
    for name in ["one.js", "two.js", "three.js"] {
        fs::write(temp_dir.path().join("js").join(name), format!("// {name}\n"))
            .expect("write auxiliary file");
    }

    let config = config_with_files(&["js/two.js", "js/three.js", "js/one.js"]);
    BundleOrchestrator::new(config, temp_dir.path().to_path_buf())
        .run()
        .expect("bundle should succeed");

    let output = fs::read_to_string(temp_dir.path().join("index-standalone.html"))
        .expect("standalone output exists");
    let positions: Vec<usize> = ["two.js", "three.js", "one.js"]
        .iter()
        .map(|name| {
            output
                .find(&format!("// ---- {name} ----"))
                .unwrap_or_else(|| panic!("origin marker for {name} missing"))
        })
        .collect();
    assert!(
        positions.windows(2).all(|pair| pair[0] < pair[1]),
        "origin markers must follow the configured order"
    );
}

#[test]
fn test_missing_closing_body_fails_without_output() {
    let temp_dir = project_with_host("<html><body><script type=\"module\">run();</script>");

    let config = config_with_files(&[]);
    let err = BundleOrchestrator::new(config, temp_dir.path().to_path_buf())
        .run()
        .expect_err("malformed host must fail");

    assert!(
        matches!(
            err.downcast_ref::<BundleError>(),
            Some(BundleError::AssemblyTargetMissing)
        ),
        "expected AssemblyTargetMissing, got {err:#}"
    );
    assert!(
        !temp_dir.path().join("index-standalone.html").exists(),
        "no output file may be produced on failure"
    );
}

#[test]
fn test_missing_auxiliary_fails_before_any_write() {
    let temp_dir = project_with_host(HOST);

    let config = config_with_files(&["js/gone.js"]);
    let err = BundleOrchestrator::new(config, temp_dir.path().to_path_buf())
        .run()
        .expect_err("missing auxiliary must fail");

    match err.downcast_ref::<BundleError>() {
        Some(BundleError::SourceUnreadable { path, .. }) => {
            assert_eq!(path, &PathBuf::from("js/gone.js"));
        }
        other => panic!("expected SourceUnreadable, got {other:?}"),
    }
    assert!(
        !temp_dir.path().join("index-standalone.html").exists(),
        "no output file may be produced on failure"
    );

    let history = fs::read_to_string(temp_dir.path().join("build-history.jsonl"))
        .expect("failure run still records history");
    let record: serde_json::Value =
        serde_json::from_str(history.lines().last().expect("one record")).expect("valid JSON line");
    assert_eq!(record["run_type"], "standalone-bundle");
    assert_eq!(record["result"], "failure");
    assert!(
        record["errors"][0].as_str().expect("error entry").contains("gone.js"),
        "failure record names the offending path"
    );
}

#[test]
fn test_success_run_records_history() {
    let temp_dir = project_with_host(HOST);
    fs::write(temp_dir.path().join("js/store.js"), "export class X {}\n")
        .expect("write store.js");

    let config = config_with_files(&["js/store.js"]);
    BundleOrchestrator::new(config, temp_dir.path().to_path_buf())
        .run()
        .expect("bundle should succeed");

    let history = fs::read_to_string(temp_dir.path().join("build-history.jsonl"))
        .expect("history log exists");
    let record: serde_json::Value =
        serde_json::from_str(history.lines().last().expect("one record")).expect("valid JSON line");
    assert_eq!(record["result"], "success");
    let files: Vec<&str> = record["files"]
        .as_array()
        .expect("files array")
        .iter()
        .map(|v| v.as_str().expect("basename"))
        .collect();
    assert_eq!(files, vec!["index.html", "store.js"]);
    assert_eq!(record["errors"].as_array().expect("errors array").len(), 0);
}

#[test]
fn test_repeated_runs_differ_only_in_timestamp() {
    let temp_dir = project_with_host(HOST);
    fs::write(
        temp_dir.path().join("js/store.js"),
        "export class X { run(){return 1;} }\n",
    )
    .expect("write store.js");

    let run = || {
        let config = config_with_files(&["js/store.js"]);
        BundleOrchestrator::new(config, temp_dir.path().to_path_buf())
            .run()
            .expect("bundle should succeed");
        fs::read_to_string(temp_dir.path().join("index-standalone.html"))
            .expect("standalone output exists")
    };

    let first = run();
    let second = run();
    assert_eq!(
        without_build_info(&first),
        without_build_info(&second),
        "repeated runs must be byte-identical apart from the stamped timestamp"
    );
}

#[test]
fn test_duplicate_auxiliary_entry_is_warned_and_recorded() {
    let temp_dir = project_with_host(HOST);
    fs::write(temp_dir.path().join("js/store.js"), "export class X {}\n")
        .expect("write store.js");

    let config = config_with_files(&["js/store.js", "js/store.js"]);
    let summary = BundleOrchestrator::new(config, temp_dir.path().to_path_buf())
        .run()
        .expect("duplicates are a warning, not an error");
    assert_eq!(summary.files_merged, 2, "duplicates bundle where they appear");

    let history = fs::read_to_string(temp_dir.path().join("build-history.jsonl"))
        .expect("history log exists");
    let record: serde_json::Value =
        serde_json::from_str(history.lines().last().expect("one record")).expect("valid JSON line");
    let warnings = record["warnings"].as_array().expect("warnings array");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().expect("warning text").contains("store.js"));
}
