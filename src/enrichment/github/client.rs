//! GitHub HTTP client
//!
//! Handles communication with the GitHub REST API.
//! See: https://docs.github.com/en/rest
//!
//! Unauthenticated clients get 60 requests per hour. GitHub signals an
//! exhausted quota with 403 (primary limit) or 429 (secondary limit); both
//! surface as [`EnrichmentError::RateLimited`].

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};

use super::{adapter, dto};
use crate::enrichment::domain::{EnrichmentError, ReleaseAsset, RepoRef, RepositoryInfo};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_SITE_BASE: &str = "https://github.com";

const API_VERSION: &str = "2022-11-28";

/// User agent string - GitHub rejects requests without one
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// GitHub API client
#[derive(Clone)]
pub struct GithubClient {
    http_client: reqwest::Client,
    api_base: String,
    site_base: String,
}

impl GithubClient {
    /// Create a new client, authenticated when a token is given
    pub fn new(token: Option<&str>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(API_VERSION),
        );
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("GitHub token contains invalid characters, ignoring it"),
            }
        }

        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            api_base: DEFAULT_API_BASE.to_string(),
            site_base: DEFAULT_SITE_BASE.to_string(),
        }
    }

    /// Point the client at a different API host (GitHub Enterprise, test servers)
    pub fn with_base_urls(mut self, api_base: impl Into<String>, site_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self.site_base = site_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn site_base(&self) -> &str {
        &self.site_base
    }

    /// Fetch repository metadata
    pub async fn fetch_repository(&self, repo: &RepoRef) -> Result<RepositoryInfo, EnrichmentError> {
        let url = format!("{}/repos/{}", self.api_base, encode_slug(repo));
        let response = self.get_checked(&url).await?;

        let body = response
            .json::<dto::RepositoryResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        adapter::to_repository_info(body)
    }

    /// List release assets, newest release first
    pub async fn list_release_assets(
        &self,
        repo: &RepoRef,
    ) -> Result<Vec<ReleaseAsset>, EnrichmentError> {
        let url = format!("{}/repos/{}/releases", self.api_base, encode_slug(repo));
        let response = self.get_checked(&url).await?;

        let releases = response
            .json::<Vec<dto::Release>>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        Ok(adapter::to_release_assets(releases))
    }

    /// Lightweight existence check (HEAD, redirects followed)
    pub async fn url_exists(&self, url: &str) -> Result<bool, EnrichmentError> {
        let response = self
            .http_client
            .head(url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }

    /// Download the avatar image of an account
    pub async fn fetch_avatar(&self, owner: &str) -> Result<Vec<u8>, EnrichmentError> {
        let url = format!("{}/users/{}", self.api_base, urlencoding::encode(owner));
        let user = self
            .get_checked(&url)
            .await?
            .json::<dto::UserResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        let avatar_url = user
            .avatar_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| EnrichmentError::InvalidResponse(format!("{} has no avatar", user.login)))?;

        let bytes = self
            .get_checked(&avatar_url)
            .await?
            .bytes()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    /// Send a GET and map non-success statuses to domain errors
    async fn get_checked(&self, url: &str) -> Result<reqwest::Response, EnrichmentError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(EnrichmentError::NotFound);
        }

        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            log_rate_limit_reset(response.headers());
            return Err(EnrichmentError::RateLimited);
        }

        if !status.is_success() {
            // Try to parse error response
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(EnrichmentError::ApiError(format!("HTTP {}: {}", status, error.message)));
            }
            return Err(EnrichmentError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        Ok(response)
    }
}

/// Path-encode both halves of `owner/repo` without encoding the separator
fn encode_slug(repo: &RepoRef) -> String {
    format!(
        "{}/{}",
        urlencoding::encode(&repo.owner),
        urlencoding::encode(&repo.repo)
    )
}

fn log_rate_limit_reset(headers: &HeaderMap) {
    let reset = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0));

    if let Some(reset) = reset {
        let local = reset.with_timezone(&chrono::Local);
        tracing::debug!("GitHub rate limit resets at {}", local.format("%H:%M:%S"));
    }
}
