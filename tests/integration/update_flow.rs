//! Full update passes through the binary, backed by mock catalogs.
//!
//! Each test points `TOOLUP_FEED_URL` at a wiremock server serving the
//! sample feed, serves installer archives from the same server, and runs the
//! real binary against a temp install root.

use crate::common::{TestProject, feed_product_config};
use toolup::test_utils::{TarGzFixture, sample_feed_xml};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Newest IntelliJ EAP build advertised by the sample feed.
const IDEA_BUILD: &str = "231.9414.13";
/// Newest CLion EAP build advertised by the sample feed.
const CLION_BUILD: &str = "231.9011.20";

async fn catalog_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/updates.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_feed_xml()))
        .mount(&server)
        .await;
    server
}

/// Builds a realistic installer archive: a versioned top-level directory
/// wrapping the product tree, the way vendors package IDE tarballs.
fn installer_archive_bytes(top_dir: &str, build: &str) -> Vec<u8> {
    let temp = tempfile::TempDir::new().unwrap();
    let archive_path = temp.path().join("fixture.tar.gz");

    TarGzFixture::new()
        .dir(&format!("{top_dir}/"))
        .file(
            &format!("{top_dir}/product-info.json"),
            format!("{{\"buildNumber\": \"{build}\"}}").as_bytes(),
        )
        .dir(&format!("{top_dir}/bin/"))
        .file_with_mode(&format!("{top_dir}/bin/launcher.sh"), b"#!/bin/sh\necho run\n", 0o755)
        .write(&archive_path)
        .unwrap();

    std::fs::read(&archive_path).unwrap()
}

#[tokio::test]
async fn test_fresh_install_end_to_end() {
    toolup::test_utils::init_test_logging(None);
    let server = catalog_server().await;
    Mock::given(method("GET"))
        .and(path(format!("/archives/idea-{IDEA_BUILD}.tar.gz")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(installer_archive_bytes(&format!("idea-{IDEA_BUILD}"), IDEA_BUILD)),
        )
        .mount(&server)
        .await;

    let project = TestProject::new().unwrap();
    project
        .write_config(&feed_product_config(
            "IntelliJ IDEA Ultimate",
            project.install_root(),
            "idea",
            &format!("{}/archives/idea-{{build}}.tar.gz", server.uri()),
        ))
        .unwrap();

    // Redirect the system temp dir so scratch cleanup is observable
    let scratch_root = tempfile::TempDir::new().unwrap();
    let scratch_path = scratch_root.path().display().to_string();
    let feed_url = format!("{}/updates.xml", server.uri());
    let envs = [
        ("TOOLUP_FEED_URL", feed_url.as_str()),
        ("TMPDIR", scratch_path.as_str()),
        ("TEMP", scratch_path.as_str()),
        ("TMP", scratch_path.as_str()),
    ];
    let output = project.run_toolup_with_env(&[], &envs).unwrap();

    assert!(output.success, "stderr was: {}", output.stderr);
    assert!(
        output.stdout.contains(&format!("updated to {IDEA_BUILD}")),
        "stdout was: {}",
        output.stdout
    );

    // The wrapping top-level directory is stripped away
    let install_dir = project.install_dir("idea");
    assert!(install_dir.join("product-info.json").exists());
    assert!(install_dir.join("bin").join("launcher.sh").exists());
    assert!(!install_dir.join(format!("idea-{IDEA_BUILD}")).exists());

    // Marker records label and build
    let marker = std::fs::read_to_string(install_dir.join("build.txt")).unwrap();
    assert_eq!(marker, format!("IntelliJ IDEA Ultimate-{IDEA_BUILD}"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(install_dir.join("bin").join("launcher.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert!(mode & 0o100 != 0, "launcher should stay executable, mode was {mode:o}");
    }

    // The per-product scratch directory is removed after a successful install
    let leftovers: Vec<_> = std::fs::read_dir(scratch_root.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert!(leftovers.is_empty(), "scratch should be cleaned up, found: {leftovers:?}");
}

#[tokio::test]
async fn test_second_run_is_a_noop() {
    toolup::test_utils::init_test_logging(None);
    let server = catalog_server().await;
    // The archive must be fetched exactly once across both runs
    Mock::given(method("GET"))
        .and(path(format!("/archives/idea-{IDEA_BUILD}.tar.gz")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(installer_archive_bytes(&format!("idea-{IDEA_BUILD}"), IDEA_BUILD)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let project = TestProject::new().unwrap();
    project
        .write_config(&feed_product_config(
            "IntelliJ IDEA Ultimate",
            project.install_root(),
            "idea",
            &format!("{}/archives/idea-{{build}}.tar.gz", server.uri()),
        ))
        .unwrap();

    let feed_url = format!("{}/updates.xml", server.uri());
    let first = project.run_toolup_with_env(&["update"], &[("TOOLUP_FEED_URL", &feed_url)]).unwrap();
    assert!(first.success, "stderr was: {}", first.stderr);

    // User data planted after the install must survive a no-op run
    let sentinel = project.install_dir("idea").join("custom.txt");
    std::fs::write(&sentinel, "user data").unwrap();

    let second =
        project.run_toolup_with_env(&["update"], &[("TOOLUP_FEED_URL", &feed_url)]).unwrap();
    assert!(second.success, "stderr was: {}", second.stderr);
    assert!(
        second.stdout.contains(&format!("already at {IDEA_BUILD}")),
        "stdout was: {}",
        second.stdout
    );
    assert!(sentinel.exists());
}

#[tokio::test]
async fn test_outdated_install_is_replaced() {
    toolup::test_utils::init_test_logging(None);
    let server = catalog_server().await;
    Mock::given(method("GET"))
        .and(path(format!("/archives/idea-{IDEA_BUILD}.tar.gz")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(installer_archive_bytes(&format!("idea-{IDEA_BUILD}"), IDEA_BUILD)),
        )
        .mount(&server)
        .await;

    let project = TestProject::new().unwrap();
    project
        .write_config(&feed_product_config(
            "IntelliJ IDEA Ultimate",
            project.install_root(),
            "idea",
            &format!("{}/archives/idea-{{build}}.tar.gz", server.uri()),
        ))
        .unwrap();

    // Simulate an older installation
    let install_dir = project.install_dir("idea");
    std::fs::create_dir_all(&install_dir).unwrap();
    std::fs::write(install_dir.join("build.txt"), "IntelliJ IDEA Ultimate-200.1").unwrap();
    std::fs::write(install_dir.join("obsolete.bin"), "old bits").unwrap();

    let feed_url = format!("{}/updates.xml", server.uri());
    let output =
        project.run_toolup_with_env(&["update"], &[("TOOLUP_FEED_URL", &feed_url)]).unwrap();

    assert!(output.success, "stderr was: {}", output.stderr);
    assert!(!install_dir.join("obsolete.bin").exists(), "old install should be removed");
    assert!(install_dir.join("product-info.json").exists());
    assert_eq!(
        std::fs::read_to_string(install_dir.join("build.txt")).unwrap(),
        format!("IntelliJ IDEA Ultimate-{IDEA_BUILD}")
    );
}

#[tokio::test]
async fn test_failed_download_leaves_existing_install_untouched() {
    toolup::test_utils::init_test_logging(None);
    let server = catalog_server().await;
    Mock::given(method("GET"))
        .and(path(format!("/archives/idea-{IDEA_BUILD}.tar.gz")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let project = TestProject::new().unwrap();
    project
        .write_config(&feed_product_config(
            "IntelliJ IDEA Ultimate",
            project.install_root(),
            "idea",
            &format!("{}/archives/idea-{{build}}.tar.gz", server.uri()),
        ))
        .unwrap();

    let install_dir = project.install_dir("idea");
    std::fs::create_dir_all(&install_dir).unwrap();
    std::fs::write(install_dir.join("build.txt"), "IntelliJ IDEA Ultimate-200.1").unwrap();
    std::fs::write(install_dir.join("old.bin"), "still needed").unwrap();

    let scratch_root = tempfile::TempDir::new().unwrap();
    let scratch_path = scratch_root.path().display().to_string();
    let feed_url = format!("{}/updates.xml", server.uri());
    let envs = [
        ("TOOLUP_FEED_URL", feed_url.as_str()),
        ("TMPDIR", scratch_path.as_str()),
        ("TEMP", scratch_path.as_str()),
        ("TMP", scratch_path.as_str()),
    ];
    let output = project.run_toolup_with_env(&["update"], &envs).unwrap();

    assert!(!output.success);
    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("Download failed"), "stderr was: {}", output.stderr);

    // The download never completed, so the old install was never touched
    assert!(install_dir.join("old.bin").exists());
    assert_eq!(
        std::fs::read_to_string(install_dir.join("build.txt")).unwrap(),
        "IntelliJ IDEA Ultimate-200.1"
    );

    // The aborted run leaves its scratch directory behind
    let leftover = std::fs::read_dir(scratch_root.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .find(|name| name.starts_with("idea-"));
    assert!(leftover.is_some(), "abort should leave the scratch directory on disk");
}

#[tokio::test]
async fn test_keep_going_processes_remaining_products() {
    toolup::test_utils::init_test_logging(None);
    let server = catalog_server().await;
    // First product's archive is gone, second one downloads fine
    Mock::given(method("GET"))
        .and(path(format!("/archives/idea-{IDEA_BUILD}.tar.gz")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/archives/clion-{CLION_BUILD}.tar.gz")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(installer_archive_bytes(
            &format!("clion-{CLION_BUILD}"),
            CLION_BUILD,
        )))
        .mount(&server)
        .await;

    let project = TestProject::new().unwrap();
    let parent = project.install_root().display().to_string().replace('\\', "/");
    project
        .write_config(&format!(
            r#"[
  {{
    "name": "IntelliJ IDEA Ultimate",
    "download_url": "{uri}/archives/idea-{{build}}.tar.gz",
    "parent_dir": "{parent}",
    "dir": "idea"
  }},
  {{
    "name": "CLion",
    "download_url": "{uri}/archives/clion-{{build}}.tar.gz",
    "parent_dir": "{parent}",
    "dir": "clion"
  }}
]"#,
            uri = server.uri(),
        ))
        .unwrap();

    let scratch_root = tempfile::TempDir::new().unwrap();
    let scratch_path = scratch_root.path().display().to_string();
    let feed_url = format!("{}/updates.xml", server.uri());
    let envs = [
        ("TOOLUP_FEED_URL", feed_url.as_str()),
        ("TMPDIR", scratch_path.as_str()),
        ("TEMP", scratch_path.as_str()),
        ("TMP", scratch_path.as_str()),
    ];
    let output = project.run_toolup_with_env(&["update", "--keep-going"], &envs).unwrap();

    // The run is reported as failed, but the second product was still updated
    assert!(!output.success);
    assert!(output.stdout.contains("failed"), "stdout was: {}", output.stdout);
    assert!(
        output.stdout.contains(&format!("updated to {CLION_BUILD}")),
        "stdout was: {}",
        output.stdout
    );
    assert!(output.stderr.contains("1 of 2 products failed"), "stderr was: {}", output.stderr);

    assert!(!project.install_dir("idea").exists());
    assert_eq!(
        std::fs::read_to_string(project.install_dir("clion").join("build.txt")).unwrap(),
        format!("CLion-{CLION_BUILD}")
    );
}

#[tokio::test]
async fn test_outdated_reports_and_check_gates() {
    toolup::test_utils::init_test_logging(None);
    let server = catalog_server().await;

    let project = TestProject::new().unwrap();
    project
        .write_config(&feed_product_config(
            "IntelliJ IDEA Ultimate",
            project.install_root(),
            "idea",
            &format!("{}/archives/idea-{{build}}.tar.gz", server.uri()),
        ))
        .unwrap();

    let feed_url = format!("{}/updates.xml", server.uri());

    // Nothing installed yet: the product shows as outdated
    let table =
        project.run_toolup_with_env(&["outdated"], &[("TOOLUP_FEED_URL", &feed_url)]).unwrap();
    assert!(table.success, "stderr was: {}", table.stderr);
    assert!(table.stdout.contains("IntelliJ IDEA Ultimate"));
    assert!(table.stdout.contains("outdated"), "stdout was: {}", table.stdout);

    // --check turns that into a non-zero exit
    let check = project
        .run_toolup_with_env(&["outdated", "--check"], &[("TOOLUP_FEED_URL", &feed_url)])
        .unwrap();
    assert!(!check.success);
    assert_eq!(check.code, Some(1));

    // JSON output is parseable stdout
    let json = project
        .run_toolup_with_env(&["outdated", "--format", "json"], &[("TOOLUP_FEED_URL", &feed_url)])
        .unwrap();
    assert!(json.success, "stderr was: {}", json.stderr);
    let report: serde_json::Value = serde_json::from_str(&json.stdout)
        .unwrap_or_else(|e| panic!("stdout was not JSON ({e}): {}", json.stdout));
    assert_eq!(report["products"][0]["name"], "IntelliJ IDEA Ultimate");
    assert_eq!(report["products"][0]["installed"], serde_json::Value::Null);
    assert_eq!(report["products"][0]["latest"], IDEA_BUILD);
    assert_eq!(report["products"][0]["outdated"], true);
    assert_eq!(report["summary"]["outdated"], 1);
}

#[tokio::test]
async fn test_outdated_after_install_is_current() {
    toolup::test_utils::init_test_logging(None);
    let server = catalog_server().await;

    let project = TestProject::new().unwrap();
    project
        .write_config(&feed_product_config(
            "IntelliJ IDEA Ultimate",
            project.install_root(),
            "idea",
            &format!("{}/archives/idea-{{build}}.tar.gz", server.uri()),
        ))
        .unwrap();

    // Install state written directly; outdated itself must not mutate anything
    let install_dir = project.install_dir("idea");
    std::fs::create_dir_all(&install_dir).unwrap();
    std::fs::write(install_dir.join("build.txt"), format!("IntelliJ IDEA Ultimate-{IDEA_BUILD}"))
        .unwrap();

    let feed_url = format!("{}/updates.xml", server.uri());
    let output = project
        .run_toolup_with_env(&["outdated", "--check"], &[("TOOLUP_FEED_URL", &feed_url)])
        .unwrap();

    assert!(output.success, "stderr was: {}", output.stderr);
    assert!(output.stdout.contains("up-to-date"), "stdout was: {}", output.stdout);
    assert!(output.stdout.contains("All products are up to date!"));
}
