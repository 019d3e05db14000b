//! GitHub API client implementation

use crate::config::Config;
use crate::core::{VersionsError, VersionsResult};
use crate::di::traits::TagSource;
use crate::github::types::{ApiErrorBody, GitHubRelease, GitHubRepo, GitHubTag};
use async_trait::async_trait;
use reqwest::{header, Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;

/// GitHub API client
pub struct GitHubClient {
    http_client: HttpClient,
    api_url: String,
    token: Option<String>,
    per_page: u32,
    max_retries: u32,
    max_backoff: Duration,
    rate_limiter: Arc<RateLimiter>,
}

/// Rate limiter for GitHub API, fed from response headers.
///
/// `remaining` is `None` until the first response or after a wait has been served.
struct RateLimiter {
    remaining: Mutex<Option<u64>>,
    reset_time: Mutex<SystemTime>,
}

impl RateLimiter {
    fn new() -> Self {
        Self {
            remaining: Mutex::new(None),
            reset_time: Mutex::new(SystemTime::now()),
        }
    }

    async fn clear(&self) {
        *self.remaining.lock().await = None;
    }
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(config: &Config) -> VersionsResult<Self> {
        let token = config.resolve_token();

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("action-versions"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            header::HeaderValue::from_static("2022-11-28"),
        );

        if let Some(ref token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| VersionsError::Config(format!("Invalid GitHub token: {}", e)))?,
            );
        }

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token,
            per_page: config.per_page,
            max_retries: config.max_retries,
            max_backoff: Duration::from_secs(config.max_backoff_secs),
            rate_limiter: Arc::new(RateLimiter::new()),
        })
    }

    /// List every repository in an organization
    pub async fn list_org_repos(&self, org: &str) -> VersionsResult<Vec<GitHubRepo>> {
        let url = format!("{}/orgs/{}/repos", self.api_url, urlencoding::encode(org));
        self.get_paginated(&url).await
    }

    /// List every tag of a repository, in the API's order
    pub async fn list_tags(&self, owner: &str, repo: &str) -> VersionsResult<Vec<GitHubTag>> {
        let url = self.repo_url(owner, repo, "tags");
        self.get_paginated(&url).await
    }

    /// The first tag the API reports for a repository
    pub async fn first_tag(&self, owner: &str, repo: &str) -> VersionsResult<Option<GitHubTag>> {
        let url = self.repo_url(owner, repo, "tags");
        let tags: Vec<GitHubTag> = self
            .api_get(&url, &[("per_page", "1".to_string())])
            .await?;
        Ok(tags.into_iter().next())
    }

    /// The latest published release, or `None` when the repository has none
    pub async fn latest_release(
        &self,
        owner: &str,
        repo: &str,
    ) -> VersionsResult<Option<GitHubRelease>> {
        let url = self.repo_url(owner, repo, "releases/latest");
        let response = self.api_request(&url, &[]).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = Self::ensure_success(&url, response).await?;
        let release = response.json().await.map_err(|e| {
            VersionsError::GitHub(format!("Failed to parse GitHub API response: {}", e))
        })?;
        Ok(Some(release))
    }

    fn repo_url(&self, owner: &str, repo: &str, endpoint: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url,
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            endpoint
        )
    }

    /// Fetch all pages of a list endpoint; a short page ends the walk
    async fn get_paginated<T: DeserializeOwned>(&self, url: &str) -> VersionsResult<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let batch: Vec<T> = self
                .api_get(
                    url,
                    &[
                        ("per_page", self.per_page.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;

            let count = batch.len();
            items.extend(batch);

            if count < self.per_page as usize {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    /// Make an API request, waiting out rate limits up to the configured budget
    async fn api_request(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> VersionsResult<reqwest::Response> {
        let mut attempt = 0u32;

        loop {
            self.wait_for_rate_limit().await?;

            tracing::debug!("GET {} {:?}", url, query);
            let response = self
                .http_client
                .get(url)
                .query(query)
                .send()
                .await?;

            self.update_rate_limit(&response).await;

            let Some(wait) = rate_limit_wait(&response) else {
                return Ok(response);
            };

            if attempt >= self.max_retries || wait > self.max_backoff {
                return Err(VersionsError::RateLimited {
                    reset_in_secs: wait.as_secs(),
                });
            }

            attempt += 1;
            tracing::warn!(
                "GitHub rate limit hit, retrying in {}s (attempt {}/{}){}",
                wait.as_secs(),
                attempt,
                self.max_retries,
                if self.token.is_none() {
                    "; set GITHUB_TOKEN to raise the limit"
                } else {
                    ""
                }
            );
            tokio::time::sleep(wait).await;
            self.rate_limiter.clear().await;
        }
    }

    /// Make an API GET request and parse JSON response
    async fn api_get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> VersionsResult<T> {
        let response = self.api_request(url, query).await?;
        let response = Self::ensure_success(url, response).await?;

        response.json().await.map_err(|e| {
            VersionsError::GitHub(format!("Failed to parse GitHub API response: {}", e))
        })
    }

    async fn ensure_success(
        url: &str,
        response: reqwest::Response,
    ) -> VersionsResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(VersionsError::GitHub(format!(
                "{} not found or inaccessible",
                url
            )));
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);

        Err(VersionsError::GitHub(format!(
            "HTTP {} from {}: {}",
            status, url, message
        )))
    }

    /// Sleep until the reset time if the budget is known to be exhausted
    async fn wait_for_rate_limit(&self) -> VersionsResult<()> {
        let remaining = *self.rate_limiter.remaining.lock().await;
        if remaining != Some(0) {
            return Ok(());
        }

        let reset_time = *self.rate_limiter.reset_time.lock().await;
        let wait = reset_time
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO);

        if wait > self.max_backoff {
            return Err(VersionsError::RateLimited {
                reset_in_secs: wait.as_secs(),
            });
        }

        if !wait.is_zero() {
            tracing::warn!("GitHub rate limit exhausted, waiting {}s", wait.as_secs());
            tokio::time::sleep(wait).await;
        }
        self.rate_limiter.clear().await;
        Ok(())
    }

    /// Update rate limit from response headers
    async fn update_rate_limit(&self, response: &reqwest::Response) {
        if let Some(remaining) = header_u64(response, "x-ratelimit-remaining") {
            *self.rate_limiter.remaining.lock().await = Some(remaining);
        }

        if let Some(reset) = header_u64(response, "x-ratelimit-reset") {
            *self.rate_limiter.reset_time.lock().await =
                SystemTime::UNIX_EPOCH + Duration::from_secs(reset);
        }
    }
}

fn header_u64(response: &reqwest::Response, name: &str) -> Option<u64> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// How long to wait before retrying, if `response` is a rate-limit signal.
///
/// A 403 without `retry-after` or an exhausted budget is a plain permission error.
fn rate_limit_wait(response: &reqwest::Response) -> Option<Duration> {
    let status = response.status();
    if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
        return None;
    }

    if let Some(secs) = header_u64(response, "retry-after") {
        return Some(Duration::from_secs(secs));
    }

    if header_u64(response, "x-ratelimit-remaining") == Some(0) {
        let reset = header_u64(response, "x-ratelimit-reset")?;
        let reset_time = SystemTime::UNIX_EPOCH + Duration::from_secs(reset);
        return Some(
            reset_time
                .duration_since(SystemTime::now())
                .unwrap_or(Duration::ZERO),
        );
    }

    None
}

#[async_trait]
impl TagSource for GitHubClient {
    async fn list_org_repos(&self, org: &str) -> VersionsResult<Vec<GitHubRepo>> {
        Self::list_org_repos(self, org).await
    }

    async fn list_tags(&self, owner: &str, repo: &str) -> VersionsResult<Vec<GitHubTag>> {
        Self::list_tags(self, owner, repo).await
    }

    async fn first_tag(&self, owner: &str, repo: &str) -> VersionsResult<Option<GitHubTag>> {
        Self::first_tag(self, owner, repo).await
    }

    async fn latest_release(
        &self,
        owner: &str,
        repo: &str,
    ) -> VersionsResult<Option<GitHubRelease>> {
        Self::latest_release(self, owner, repo).await
    }
}
