//! Trait definitions for the engine's external collaborators.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses [`GithubClient`], [`DirectoryIconStore`] and
//! [`TokioCooldown`]; tests substitute the mocks at the bottom of this file.
//!
//! [`GithubClient`]: super::github::GithubClient
//! [`DirectoryIconStore`]: super::icons::DirectoryIconStore
//! [`TokioCooldown`]: super::rate_limit::TokioCooldown

use std::time::Duration;

use async_trait::async_trait;

use super::domain::{EnrichmentError, ReleaseAsset, RepoRef, RepositoryInfo};

/// Repository metadata lookup.
#[async_trait]
pub trait RepositoryApi: Send + Sync {
    /// Fetch metadata for one repository. This is the call the engine
    /// issues at most once per record (plus identical rate-limit retries).
    async fn fetch_repository(&self, repo: &RepoRef) -> Result<RepositoryInfo, EnrichmentError>;

    /// List downloadable release assets, newest release first.
    async fn list_release_assets(
        &self,
        repo: &RepoRef,
    ) -> Result<Vec<ReleaseAsset>, EnrichmentError>;

    /// Check whether a URL resolves without downloading it.
    async fn url_exists(&self, url: &str) -> Result<bool, EnrichmentError>;

    /// Base URL of the hosting site, for building conventional file URLs.
    fn site_base(&self) -> &str;
}

/// Owner avatar download, used by the icon store.
#[async_trait]
pub trait AvatarApi: Send + Sync {
    async fn fetch_avatar(&self, owner: &str) -> Result<Vec<u8>, EnrichmentError>;
}

/// Where plugin icons live.
#[async_trait]
pub trait IconStore: Send + Sync {
    /// Whether an icon already exists for this identifier.
    fn has_icon(&self, id: &str) -> bool;

    /// Fetch and store an icon for this identifier from the owner's avatar.
    async fn fetch_icon(&self, id: &str, owner: &str) -> Result<(), EnrichmentError>;
}

/// How a cooldown wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full interval passed
    Elapsed,
    /// The user cancelled the wait
    Interrupted,
}

/// Blocking wait used while rate limited, and the run's interrupt source.
#[async_trait]
pub trait Cooldown: Send + Sync {
    async fn wait(&self, duration: Duration) -> WaitOutcome;

    /// Whether the user asked to stop outside of a wait. Checked before each record.
    fn stop_requested(&self) -> bool {
        false
    }
}

// Implement traits for real clients

#[async_trait]
impl RepositoryApi for super::github::GithubClient {
    async fn fetch_repository(&self, repo: &RepoRef) -> Result<RepositoryInfo, EnrichmentError> {
        self.fetch_repository(repo).await
    }

    async fn list_release_assets(
        &self,
        repo: &RepoRef,
    ) -> Result<Vec<ReleaseAsset>, EnrichmentError> {
        self.list_release_assets(repo).await
    }

    async fn url_exists(&self, url: &str) -> Result<bool, EnrichmentError> {
        self.url_exists(url).await
    }

    fn site_base(&self) -> &str {
        self.site_base()
    }
}

#[async_trait]
impl AvatarApi for super::github::GithubClient {
    async fn fetch_avatar(&self, owner: &str) -> Result<Vec<u8>, EnrichmentError> {
        self.fetch_avatar(owner).await
    }
}
