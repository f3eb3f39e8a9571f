//! Resolution of the latest published release.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use tracing::{debug, info, warn};

use super::manifest::{GitHubRelease, ReleaseManifest};
use crate::manager::error::{ManagerError, ManagerResult};

/// Default GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default repository owner.
pub const DEFAULT_OWNER: &str = "Breach-In-The-Containment";

/// Default repository name.
pub const DEFAULT_REPO: &str = "get-mods";

/// Media type requested from the release index.
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Default `User-Agent`; the GitHub API rejects requests without one.
pub fn default_user_agent() -> String {
    format!("launchsync/{}", env!("CARGO_PKG_VERSION"))
}

/// Repository whose releases are tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSource {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    pub user_agent: String,
}

impl Default for ReleaseSource {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            owner: DEFAULT_OWNER.to_string(),
            repo: DEFAULT_REPO.to_string(),
            user_agent: default_user_agent(),
        }
    }
}

impl ReleaseSource {
    /// Source for `owner/repo` on the public GitHub API.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            ..Default::default()
        }
    }

    /// Point at a different API host, such as a test server.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// URL of the "latest release" resource.
    pub fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }
}

/// Source of release manifests.
pub trait ReleaseResolver: Send + Sync {
    /// Fetch the latest release.
    ///
    /// Fails with `AssetNotFound` when any required asset is absent, so
    /// callers never start a download against an incomplete release.
    fn resolve(&self) -> ManagerResult<ReleaseManifest>;
}

/// Resolver backed by the GitHub releases API.
#[derive(Debug)]
pub struct GitHubReleaseResolver {
    client: Client,
    source: ReleaseSource,
    required_assets: Vec<String>,
    timeout: Duration,
}

impl GitHubReleaseResolver {
    /// Create a resolver requiring `required_assets` on every release.
    pub fn new(
        source: ReleaseSource,
        required_assets: impl IntoIterator<Item = String>,
        timeout: Duration,
    ) -> ManagerResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(source.user_agent.clone())
            .build()
            .map_err(|e| ManagerError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            source,
            required_assets: required_assets.into_iter().collect(),
            timeout,
        })
    }

    /// The tracked repository.
    pub fn source(&self) -> &ReleaseSource {
        &self.source
    }

    fn fetch(&self, url: &str) -> ManagerResult<GitHubRelease> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .map_err(|e| ManagerError::from_request(url, e, self.timeout.as_secs()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Release index request failed");
            return Err(ManagerError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .map_err(|e| ManagerError::from_request(url, e, self.timeout.as_secs()))?;

        serde_json::from_str(&body).map_err(|e| ManagerError::ReleaseParseFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

impl ReleaseResolver for GitHubReleaseResolver {
    fn resolve(&self) -> ManagerResult<ReleaseManifest> {
        let url = self.source.latest_release_url();
        info!(url = %url, "Fetching latest release");

        let manifest = ReleaseManifest::from(self.fetch(&url)?);
        debug!(tag = %manifest.tag, assets = manifest.assets.len(), "Release index parsed");

        for name in &self.required_assets {
            let asset = manifest.require(name)?;
            debug!(asset = %name, size = asset.size_bytes, "Required asset present");
        }

        info!(tag = %manifest.tag, "Resolved latest release");
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASE_PATH: &str = "/repos/owner/repo/releases/latest";

    fn resolver(server: &mockito::Server) -> GitHubReleaseResolver {
        let source = ReleaseSource::new("owner", "repo")
            .with_api_url(server.url())
            .with_user_agent("launchsync-tests");
        GitHubReleaseResolver::new(
            source,
            vec!["tree.txt".to_string(), "data.zip".to_string()],
            Duration::from_secs(10),
        )
        .unwrap()
    }

    #[test]
    fn test_latest_release_url() {
        let source = ReleaseSource::default();
        assert_eq!(
            source.latest_release_url(),
            "https://api.github.com/repos/Breach-In-The-Containment/get-mods/releases/latest"
        );

        let source = ReleaseSource::new("o", "r").with_api_url("http://localhost:1234/");
        assert_eq!(
            source.latest_release_url(),
            "http://localhost:1234/repos/o/r/releases/latest"
        );
    }

    #[test]
    fn test_default_user_agent_names_crate() {
        assert!(default_user_agent().starts_with("launchsync/"));
    }

    #[test]
    fn test_resolve_success_sends_headers() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", RELEASE_PATH)
            .match_header("accept", GITHUB_ACCEPT)
            .match_header("user-agent", "launchsync-tests")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"tag_name": "v1.2.0", "assets": [
                    {"name": "tree.txt", "browser_download_url": "https://dl/tree.txt", "size": 100},
                    {"name": "data.zip", "browser_download_url": "https://dl/data.zip", "size": 2048}
                ]}"#,
            )
            .create();

        let manifest = resolver(&server).resolve().unwrap();
        mock.assert();

        assert_eq!(manifest.tag, "v1.2.0");
        assert_eq!(manifest.require("data.zip").unwrap().size_bytes, 2048);
    }

    #[test]
    fn test_resolve_missing_asset_is_not_found() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", RELEASE_PATH)
            .with_status(200)
            .with_body(
                r#"{"tag_name": "v1", "assets": [
                    {"name": "tree.txt", "browser_download_url": "https://dl/tree.txt", "size": 1}
                ]}"#,
            )
            .create();

        let err = resolver(&server).resolve().unwrap_err();
        assert!(matches!(
            err,
            ManagerError::AssetNotFound { ref asset, .. } if asset == "data.zip"
        ));
        assert_eq!(err.kind(), crate::manager::ErrorKind::NotFound);
    }

    #[test]
    fn test_resolve_http_error_is_network() {
        let mut server = mockito::Server::new();
        let _m = server.mock("GET", RELEASE_PATH).with_status(403).create();

        let err = resolver(&server).resolve().unwrap_err();
        assert!(matches!(err, ManagerError::HttpStatus { status: 403, .. }));
        assert_eq!(err.kind(), crate::manager::ErrorKind::Network);
    }

    #[test]
    fn test_resolve_malformed_json() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", RELEASE_PATH)
            .with_status(200)
            .with_body("<html>rate limited</html>")
            .create();

        let err = resolver(&server).resolve().unwrap_err();
        assert!(matches!(err, ManagerError::ReleaseParseFailed { .. }));
    }
}
