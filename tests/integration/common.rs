//! Common utilities for integration tests

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const README: &str = "# Latest action versions\n\nIntro.\n\n<!-- VERSIONS_START -->\n<!-- VERSIONS_END -->\n\nFooter.\n";

pub fn versions_command() -> Command {
    let mut cmd = Command::cargo_bin("action-versions").unwrap();
    cmd.env_remove("GITHUB_TOKEN");
    cmd
}

/// Write `versions.yaml` pointing at the mock server, plus `extra` YAML lines
pub fn write_config(dir: &Path, server: &MockServer, extra: &str) {
    fs::write(
        dir.join("versions.yaml"),
        format!("api_url: {}\n{}", server.uri(), extra),
    )
    .unwrap();
}

pub async fn mount_org(server: &MockServer, org: &str, repos: &[&str]) {
    let body: Vec<_> = repos
        .iter()
        .map(|name| serde_json::json!({ "name": name }))
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/orgs/{}/repos", org)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_tags(server: &MockServer, owner: &str, repo: &str, tags: &[&str]) {
    let body: Vec<_> = tags
        .iter()
        .map(|name| serde_json::json!({ "name": name, "commit": { "sha": "0000000" } }))
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}/tags", owner, repo)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}
