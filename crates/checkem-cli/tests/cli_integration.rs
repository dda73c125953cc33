use std::fs;
use std::path::Path;
use std::process::Command;

/// Write a runner tree with schemas for every built-in resource type.
fn runner_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let schemas = dir.path().join("resources/es_mappings");
    fs::create_dir_all(&schemas).unwrap();
    for plural in ["agents", "offices", "openhouses", "properties"] {
        fs::write(
            schemas.join(format!("es_{plural}_standard.json")),
            r#"{"mappings": {"_doc": {"properties": {"Price": {"type": "long"}}}}}"#,
        )
        .unwrap();
        fs::write(
            schemas.join(format!("es_{plural}_custom.json")),
            r#"{"properties": {"PhotoNest": {"type": "nested", "properties": {"Url": {}}}}}"#,
        )
        .unwrap();
    }
    fs::create_dir_all(dir.path().join("mappings/acme")).unwrap();
    fs::create_dir_all(dir.path().join("metadata")).unwrap();
    dir
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn checkem_bin(root: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_checkem"));
    cmd.arg("--root")
        .arg(root)
        .env_remove("CHECKEM_ROOT")
        .env_remove("RUST_LOG");
    cmd
}

const PHOTO_MAPPING: &str =
    r#"{"price": "Price", "photos": ["PhotoNest", {"Name": "x", "Type": "string", "photos": "Url"}]}"#;

#[test]
fn cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_checkem"))
        .arg("--help")
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("validate a board's search-index mappings"));
}

#[test]
fn cli_missing_board_prints_usage() {
    let output = Command::new(env!("CARGO_BIN_EXE_checkem"))
        .output()
        .expect("failed to run");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage: checkem <board name>"));
}

#[test]
fn cli_clean_board() {
    let root = runner_root();
    write(root.path(), "mappings/acme/acme_property_res_mapping.json", PHOTO_MAPPING);
    write(root.path(), "metadata/acme_property_res.csv", "SystemName\nprice\nphotos\n");

    let output = checkem_bin(root.path())
        .arg("acme")
        .output()
        .expect("failed to run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "acme_property_res_mapping.json\nCount 0\n");
}

#[test]
fn cli_reports_diagnostics_and_exit_code() {
    let root = runner_root();
    write(root.path(), "mappings/acme/acme_property_a_mapping.json", PHOTO_MAPPING);
    write(
        root.path(),
        "metadata/acme_property_a.csv",
        "SystemName\nprice\nphotos\nUnused\n",
    );
    write(
        root.path(),
        "mappings/acme/acme_property_b_mapping.json",
        r#"{"price": "Cost", "beds": 3}"#,
    );
    write(root.path(), "metadata/acme_property_b.csv", "SystemName\nprice\nbeds\n");

    let output = checkem_bin(root.path())
        .arg("acme")
        .output()
        .expect("failed to run");
    assert_eq!(output.status.code(), Some(4));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "acme_property_a_mapping.json\n\
         \tUnused: Not found in mappings\n\
         acme_property_b_mapping.json\n\
         \tbeds: Unknown mapping\n\
         \tprice: Cost is not in property's standard nor custom schema\n\
         \tbeds: Not found in mappings\n\
         Count 4\n"
    );
}

#[test]
fn cli_json_format() {
    let root = runner_root();
    write(root.path(), "mappings/acme/acme_property_a_mapping.json", "[]");

    let output = checkem_bin(root.path())
        .args(["acme", "--format", "json"])
        .output()
        .expect("failed to run");
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let result: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON output");
    assert_eq!(result["board"], "acme");
    assert_eq!(result["count"], 1);
    assert_eq!(result["files"][0]["file"], "acme_property_a_mapping.json");
    assert_eq!(result["files"][0]["errors"], 1);
}

#[test]
fn cli_fatal_setup_error() {
    let root = runner_root();
    fs::remove_file(root.path().join("resources/es_mappings/es_agents_standard.json")).unwrap();

    let output = checkem_bin(root.path())
        .arg("acme")
        .output()
        .expect("failed to run");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("es_agents_standard.json"));
}

#[test]
fn cli_missing_board_directory_is_fatal() {
    let root = runner_root();
    let output = checkem_bin(root.path())
        .arg("other")
        .output()
        .expect("failed to run");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn cli_root_from_environment_and_preflight_warnings() {
    let root = runner_root();
    write(root.path(), "mappings/acme/acme_property_res_mapping.json", PHOTO_MAPPING);
    write(root.path(), "metadata/acme_property_res.csv", "SystemName\nprice\nphotos\n");

    let output = Command::new(env!("CARGO_BIN_EXE_checkem"))
        .arg("acme")
        .env("CHECKEM_ROOT", root.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("acme.env"));
    assert!(stderr.contains("test_acme_queries.json"));
}

#[test]
fn cli_config_file_overrides_resources() {
    let root = runner_root();
    write(
        root.path(),
        "checkem.yaml",
        "resources:\n  - { name: property, plural: properties }\n",
    );
    write(root.path(), "mappings/acme/acme_agent_res_mapping.json", "{}");

    let output = checkem_bin(root.path())
        .arg("acme")
        .output()
        .expect("failed to run");
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\tunknown resource type \"agent\"\n"));
    assert!(stdout.ends_with("Count 1\n"));
}
