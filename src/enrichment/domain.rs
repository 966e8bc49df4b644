//! Internal domain models for catalogue enrichment.
//!
//! These types are OUR types - they don't change when the GitHub API changes.
//! All external API responses get converted into these types via adapters.

use std::fmt;

use reqwest::Url;

/// Hosts we know how to enrich from.
const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com"];

/// An `owner/repository` reference on the source-code host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse a repository URL from a catalogue entry.
    ///
    /// Returns `None` unless the URL points at a recognized host and carries
    /// both an owner and a repository path segment.
    pub fn parse(repository_url: &str) -> Option<Self> {
        let trimmed = repository_url.trim();
        if trimmed.is_empty() {
            return None;
        }

        // Catalogue entries occasionally omit the scheme
        let url = Url::parse(trimmed)
            .ok()
            .filter(|u| u.has_host())
            .or_else(|| Url::parse(&format!("https://{trimmed}")).ok())?;

        let host = url.host_str()?.to_ascii_lowercase();
        if !GITHUB_HOSTS.contains(&host.as_str()) {
            return None;
        }

        let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
        let owner = segments.next()?;
        let repo = segments.next()?;
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if repo.is_empty() {
            return None;
        }

        Some(Self::new(owner, repo))
    }

    /// `owner/repo`, the form used in API paths and log lines.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Repository metadata obtained from the source-code host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryInfo {
    /// Canonical repository name (as the host spells it)
    pub name: String,
    /// Login of the owning account
    pub owner: String,
    /// Free-text description, `None` when the repository has none
    pub description: Option<String>,
    /// Default branch, used for the conventional download path probe
    pub default_branch: String,
}

/// A downloadable file attached to a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub name: String,
    pub download_url: String,
}

/// Errors that can occur while talking to external collaborators
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Repository not found")]
    NotFound,

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl EnrichmentError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}
