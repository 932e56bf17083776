//! GitHub Releases API implementation

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::release::error::ReleaseError;
use crate::release::source::ReleaseSource;
use crate::release::types::{ReleaseInfo, RepositoryRef};

/// Default base URL for the GitHub REST API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// The check runs inline in the host's update cycle, so it must not hang
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Release source backed by the GitHub Releases API
pub struct GitHubReleaseSource {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubReleaseSource {
    /// Creates a new source against `base_url`, sending `headers` with every request
    pub fn new(base_url: &str, headers: HeaderMap) -> Result<Self, ReleaseError> {
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn latest_release_url(&self, repo: &RepositoryRef) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.base_url,
            repo.owner(),
            repo.name()
        )
    }
}

#[async_trait::async_trait]
impl ReleaseSource for GitHubReleaseSource {
    async fn latest_release(&self, repo: &RepositoryRef) -> Result<ReleaseInfo, ReleaseError> {
        let url = self.latest_release_url(repo);
        debug!("Fetching latest release: {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, HeaderValue::from_static("application/vnd.github+json"))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ReleaseError::NotFound(repo.to_string()));
        }

        if status != reqwest::StatusCode::OK {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(ReleaseError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let release: ReleaseInfo = response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub release response: {}", e);
            ReleaseError::InvalidResponse(e.to_string())
        })?;

        if release.tag_name.trim().is_empty() {
            return Err(ReleaseError::MissingTag(repo.to_string()));
        }

        Ok(release)
    }

    fn download_url(&self, repo: &RepositoryRef, version: &str) -> String {
        format!(
            "{}/repos/{}/{}/zipball/{}",
            self.base_url,
            repo.owner(),
            repo.name(),
            version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use reqwest::header::{AUTHORIZATION, USER_AGENT};

    fn repo() -> RepositoryRef {
        RepositoryRef::new("softtent", "toolkit")
    }

    fn headers(token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("toolkit updater"));
        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("token {}", token)).unwrap(),
            );
        }
        headers
    }

    #[tokio::test]
    async fn latest_release_returns_release_fields() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/softtent/toolkit/releases/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "tag_name": "v1.3.0",
                    "html_url": "https://github.com/softtent/toolkit/releases/tag/v1.3.0",
                    "zipball_url": "https://api.github.com/repos/softtent/toolkit/zipball/v1.3.0",
                    "body": "Fixed things",
                    "draft": false
                }"#,
            )
            .create_async()
            .await;

        let source = GitHubReleaseSource::new(&server.url(), headers(None)).unwrap();
        let release = source.latest_release(&repo()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(release.tag_name, "v1.3.0");
        assert_eq!(
            release.zipball_url,
            "https://api.github.com/repos/softtent/toolkit/zipball/v1.3.0"
        );
        assert_eq!(release.body.as_deref(), Some("Fixed things"));
    }

    #[tokio::test]
    async fn latest_release_sends_client_headers() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/softtent/toolkit/releases/latest")
            .match_header("user-agent", "toolkit updater")
            .match_header("authorization", "token secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"tag_name": "v1.0.0"}"#)
            .create_async()
            .await;

        let source = GitHubReleaseSource::new(&server.url(), headers(Some("secret"))).unwrap();
        let result = source.latest_release(&repo()).await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn latest_release_returns_not_found_for_repository_without_releases() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/softtent/toolkit/releases/latest")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let source = GitHubReleaseSource::new(&server.url(), headers(None)).unwrap();
        let result = source.latest_release(&repo()).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ReleaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn latest_release_rejects_non_ok_status() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/softtent/toolkit/releases/latest")
            .with_status(403)
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let source = GitHubReleaseSource::new(&server.url(), headers(None)).unwrap();
        let result = source.latest_release(&repo()).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ReleaseError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn latest_release_returns_missing_tag_when_tag_absent() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/softtent/toolkit/releases/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"html_url": "https://github.com/softtent/toolkit"}"#)
            .create_async()
            .await;

        let source = GitHubReleaseSource::new(&server.url(), headers(None)).unwrap();
        let result = source.latest_release(&repo()).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ReleaseError::MissingTag(_))));
    }

    #[tokio::test]
    async fn latest_release_rejects_malformed_body() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/softtent/toolkit/releases/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json")
            .create_async()
            .await;

        let source = GitHubReleaseSource::new(&server.url(), headers(None)).unwrap();
        let result = source.latest_release(&repo()).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ReleaseError::InvalidResponse(_))));
    }

    #[test]
    fn download_url_points_at_zipball_for_version() {
        let source = GitHubReleaseSource::new("https://api.github.com/", HeaderMap::new()).unwrap();

        assert_eq!(
            source.download_url(&repo(), "v1.3.0"),
            "https://api.github.com/repos/softtent/toolkit/zipball/v1.3.0"
        );
    }
}
