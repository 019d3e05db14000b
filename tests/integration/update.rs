use super::common::*;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_github() -> MockServer {
    let server = MockServer::start().await;
    mount_org(
        &server,
        "actions",
        &["setup-node", "setup-python", "no-tags-repo"],
    )
    .await;
    mount_tags(&server, "actions", "setup-node", &["v4.1.0", "v4", "v3"]).await;
    mount_tags(&server, "actions", "setup-python", &["v5", "v10-beta", "v4"]).await;
    mount_tags(&server, "actions", "no-tags-repo", &[]).await;
    mount_tags(&server, "astral-sh", "setup-uv", &["v3", "v2"]).await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_writes_all_outputs() {
    let server = mock_github().await;
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), &server, "");
    fs::write(temp.path().join("README.md"), README).unwrap();

    versions_command()
        .current_dir(temp.path())
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated"));

    assert_eq!(
        read(temp.path(), "versions.txt"),
        "actions/setup-node@v4\nactions/setup-python@v5\nastral-sh/setup-uv@v3\n"
    );
    assert_eq!(
        read(temp.path(), "README.md"),
        "# Latest action versions\n\nIntro.\n\n<!-- VERSIONS_START -->\n```\nactions/setup-node@v4\nactions/setup-python@v5\nastral-sh/setup-uv@v3\n```\n<!-- VERSIONS_END -->\n\nFooter.\n"
    );
    assert_eq!(
        read(temp.path(), "unversioned.txt"),
        "actions/no-tags-repo\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_skips_cached_unversioned_repos() {
    let server = MockServer::start().await;
    mount_org(&server, "actions", &["setup-node", "toolkit"]).await;
    mount_tags(&server, "actions", "setup-node", &["v4"]).await;
    mount_tags(&server, "astral-sh", "setup-uv", &["v3"]).await;
    Mock::given(method("GET"))
        .and(path("/repos/actions/toolkit/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    write_config(temp.path(), &server, "");
    fs::write(temp.path().join("README.md"), README).unwrap();
    fs::write(temp.path().join("unversioned.txt"), "actions/toolkit\n").unwrap();

    versions_command()
        .current_dir(temp.path())
        .arg("update")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Loaded 1 known unversioned repos from cache",
        ));

    assert_eq!(
        read(temp.path(), "versions.txt"),
        "actions/setup-node@v4\nastral-sh/setup-uv@v3\n"
    );
    assert_eq!(read(temp.path(), "unversioned.txt"), "actions/toolkit\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_missing_explicit_repo_leaves_files_untouched() {
    let server = MockServer::start().await;
    mount_org(&server, "actions", &["setup-node"]).await;
    mount_tags(&server, "actions", "setup-node", &["v4"]).await;
    Mock::given(method("GET"))
        .and(path("/repos/someone/gone/tags"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({ "message": "Not Found" })),
        )
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    write_config(temp.path(), &server, "repositories:\n  - someone/gone\n");
    fs::write(temp.path().join("README.md"), README).unwrap();

    versions_command()
        .current_dir(temp.path())
        .arg("update")
        .assert()
        .failure()
        .stderr(predicate::str::contains("someone/gone"));

    assert_eq!(read(temp.path(), "README.md"), README);
    assert!(!temp.path().join("versions.txt").exists());
    assert!(!temp.path().join("unversioned.txt").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_missing_markers_fails() {
    let server = mock_github().await;
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), &server, "");
    fs::write(temp.path().join("README.md"), "# No markers\n").unwrap();

    versions_command()
        .current_dir(temp.path())
        .arg("update")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed document"));

    assert_eq!(read(temp.path(), "README.md"), "# No markers\n");
    assert!(!temp.path().join("versions.txt").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_dry_run_writes_nothing() {
    let server = mock_github().await;
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), &server, "");
    fs::write(temp.path().join("README.md"), README).unwrap();

    versions_command()
        .current_dir(temp.path())
        .args(["update", "--dry-run"])
        .assert()
        .success()
        .stdout("actions/setup-node@v4\nactions/setup-python@v5\nastral-sh/setup-uv@v3\n")
        .stderr(predicate::str::contains("would update"))
        .stderr(predicate::str::contains("Resolving 4 action(s)"));

    assert_eq!(read(temp.path(), "README.md"), README);
    assert!(!temp.path().join("versions.txt").exists());
    assert!(!temp.path().join("unversioned.txt").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_with_explicit_config_path() {
    let server = mock_github().await;
    let temp = TempDir::new().unwrap();
    let site = temp.path().join("site");
    fs::create_dir(&site).unwrap();
    write_config(&site, &server, "");
    fs::write(site.join("README.md"), README).unwrap();

    versions_command()
        .current_dir(temp.path())
        .args(["--config", "site/versions.yaml", "update"])
        .assert()
        .success();

    assert!(read(&site, "versions.txt").contains("actions/setup-node@v4"));
    assert!(!temp.path().join("versions.txt").exists());
}
