//! CLI behavior tests: argument handling, config resolution, init workflow.

use crate::common::TestProject;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    toolup::test_utils::init_test_logging(None);
    let mut cmd = assert_cmd::Command::cargo_bin("toolup").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("outdated"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_version_flag() {
    toolup::test_utils::init_test_logging(None);
    let mut cmd = assert_cmd::Command::cargo_bin("toolup").unwrap();
    cmd.arg("--version").assert().success().stdout(predicate::str::contains("toolup"));
}

#[test]
fn test_conflicting_verbosity_flags_rejected() {
    toolup::test_utils::init_test_logging(None);
    let mut cmd = assert_cmd::Command::cargo_bin("toolup").unwrap();
    cmd.args(["--verbose", "--quiet", "update"]).assert().failure();
}

#[test]
fn test_missing_config_reports_path_and_hint() {
    toolup::test_utils::init_test_logging(None);
    let project = TestProject::new().unwrap();

    let output = project.run_toolup(&["update"]).unwrap();
    assert!(!output.success);
    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("toolup.json"), "stderr was: {}", output.stderr);
    assert!(output.stderr.contains("toolup init"), "stderr was: {}", output.stderr);
}

#[test]
fn test_malformed_config_is_fatal() {
    toolup::test_utils::init_test_logging(None);
    let project = TestProject::new().unwrap();
    project.write_config("{ \"not\": \"an array\" }").unwrap();

    let output = project.run_toolup(&["update"]).unwrap();
    assert!(!output.success);
    assert!(
        output.stderr.contains("Invalid config file syntax"),
        "stderr was: {}",
        output.stderr
    );
}

#[test]
fn test_bare_invocation_runs_update() {
    toolup::test_utils::init_test_logging(None);
    let project = TestProject::new().unwrap();
    project.write_config("[]").unwrap();

    let output = project.run_toolup(&[]).unwrap();
    assert!(output.success, "stderr was: {}", output.stderr);
    assert!(output.stdout.contains("No products configured"));
}

#[test]
fn test_disabled_products_are_skipped() {
    toolup::test_utils::init_test_logging(None);
    let project = TestProject::new().unwrap();
    project
        .write_config(
            r#"[
  {
    "name": "Old Tool",
    "download_url": "https://localhost:1/never-fetched-{build}.tar.gz",
    "parent_dir": "/opt/tools",
    "dir": "old-tool",
    "enabled": false
  }
]"#,
        )
        .unwrap();

    let output = project.run_toolup(&["update"]).unwrap();
    assert!(output.success, "stderr was: {}", output.stderr);
    assert!(output.stdout.contains("skipped"), "stdout was: {}", output.stdout);
    assert!(output.stdout.contains("disabled in config"));
}

#[test]
fn test_product_without_dirs_is_skipped() {
    toolup::test_utils::init_test_logging(None);
    let project = TestProject::new().unwrap();
    project
        .write_config(
            r#"[
  {
    "name": "Pathless",
    "download_url": "https://localhost:1/never-fetched-{build}.tar.gz",
    "parent_dir": "",
    "dir": ""
  }
]"#,
        )
        .unwrap();

    let output = project.run_toolup(&["update"]).unwrap();
    assert!(output.success, "stderr was: {}", output.stderr);
    assert!(output.stdout.contains("missing install directory configuration"));
}

#[test]
fn test_config_flag_overrides_default_location() {
    toolup::test_utils::init_test_logging(None);
    let project = TestProject::new().unwrap();
    // No toolup.json in the project dir; the flag points elsewhere
    let alt = project.install_root().join("alt-config.json");
    std::fs::write(&alt, "[]").unwrap();

    let output = project.run_toolup(&["--config", alt.to_str().unwrap(), "update"]).unwrap();
    assert!(output.success, "stderr was: {}", output.stderr);
}

#[test]
fn test_config_env_var_overrides_default_location() {
    toolup::test_utils::init_test_logging(None);
    let project = TestProject::new().unwrap();
    let alt = project.install_root().join("env-config.json");
    std::fs::write(&alt, "[]").unwrap();

    let output = project
        .run_toolup_with_env(&["update"], &[("TOOLUP_CONFIG", alt.to_str().unwrap())])
        .unwrap();
    assert!(output.success, "stderr was: {}", output.stderr);
}

#[test]
fn test_init_writes_parseable_config() {
    toolup::test_utils::init_test_logging(None);
    let project = TestProject::new().unwrap();

    let output = project.run_toolup(&["init"]).unwrap();
    assert!(output.success, "stderr was: {}", output.stderr);

    let config_path = project.project_path().join("toolup.json");
    assert!(config_path.exists());

    let content = std::fs::read_to_string(&config_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(parsed.is_array());
    assert_eq!(parsed[0]["name"], "IntelliJ IDEA Ultimate");
}

#[test]
fn test_init_refuses_overwrite_without_force() {
    toolup::test_utils::init_test_logging(None);
    let project = TestProject::new().unwrap();
    project.write_config("[]").unwrap();

    let output = project.run_toolup(&["init"]).unwrap();
    assert!(!output.success);
    assert!(output.stderr.contains("--force"), "stderr was: {}", output.stderr);

    // Original content untouched
    let content = std::fs::read_to_string(project.project_path().join("toolup.json")).unwrap();
    assert_eq!(content, "[]");
}

#[test]
fn test_init_force_overwrites() {
    toolup::test_utils::init_test_logging(None);
    let project = TestProject::new().unwrap();
    project.write_config("[]").unwrap();

    let output = project.run_toolup(&["init", "--force"]).unwrap();
    assert!(output.success, "stderr was: {}", output.stderr);

    let content = std::fs::read_to_string(project.project_path().join("toolup.json")).unwrap();
    assert!(content.contains("IntelliJ IDEA Ultimate"));
}

#[test]
fn test_init_honors_config_flag() {
    toolup::test_utils::init_test_logging(None);
    let project = TestProject::new().unwrap();
    let nested = project.install_root().join("nested").join("toolup.json");

    let output = project.run_toolup(&["--config", nested.to_str().unwrap(), "init"]).unwrap();
    assert!(output.success, "stderr was: {}", output.stderr);
    assert!(nested.exists());
    assert!(!project.project_path().join("toolup.json").exists());
}
