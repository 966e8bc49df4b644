//! GitHub REST API Data Transfer Objects
//!
//! These types match what the GitHub REST API returns, trimmed to the fields
//! we read. DO NOT use these types outside the github module - convert to
//! domain types.
//!
//! API Reference: https://docs.github.com/en/rest/repos

use serde::{Deserialize, Serialize};

/// `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepositoryResponse {
    /// Repository name as GitHub spells it
    pub name: String,
    /// Owning account
    pub owner: Account,
    /// Free-text description (null when unset)
    pub description: Option<String>,
    /// Default branch (missing on some legacy mirrors)
    pub default_branch: Option<String>,
}

/// User or organization summary embedded in other responses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Account {
    pub login: String,
}

/// `GET /users/{username}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserResponse {
    pub login: String,
    pub avatar_url: Option<String>,
}

/// Entry of `GET /repos/{owner}/{repo}/releases` (newest first)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A file attached to a release
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
}

/// Error body GitHub sends with non-2xx responses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub message: String,
    pub documentation_url: Option<String>,
}
