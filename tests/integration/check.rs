use super::common::*;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use wiremock::MockServer;

async fn mock_github() -> MockServer {
    let server = MockServer::start().await;
    mount_org(&server, "actions", &["checkout"]).await;
    mount_tags(&server, "actions", "checkout", &["v6", "v5"]).await;
    mount_tags(&server, "astral-sh", "setup-uv", &["v3"]).await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_passes_after_update() {
    let server = mock_github().await;
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), &server, "");
    fs::write(temp.path().join("README.md"), README).unwrap();

    versions_command()
        .current_dir(temp.path())
        .arg("update")
        .assert()
        .success();

    versions_command()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_fails_on_stale_document() {
    let server = mock_github().await;
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), &server, "");
    fs::write(temp.path().join("README.md"), README).unwrap();

    versions_command()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("README.md is out of date"));

    assert_eq!(read(temp.path(), "README.md"), README);
    assert!(!temp.path().join("versions.txt").exists());
}
