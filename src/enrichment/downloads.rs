//! Download URL resolution for plugin packages.
//!
//! Prefers a release asset whose name ends in the package suffix. Repositories
//! without releases often commit the package under `Release/`, so that path on
//! the default branch is probed as a fallback.

use super::domain::{EnrichmentError, RepoRef, RepositoryInfo};
use super::traits::RepositoryApi;

pub const DEFAULT_PACKAGE_SUFFIX: &str = ".streamDeckPlugin";

#[derive(Debug, Clone)]
pub struct DownloadResolver {
    suffix: String,
}

impl Default for DownloadResolver {
    fn default() -> Self {
        Self::new(DEFAULT_PACKAGE_SUFFIX)
    }
}

impl DownloadResolver {
    pub fn new(suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        let suffix = if suffix.starts_with('.') {
            suffix
        } else {
            format!(".{suffix}")
        };
        Self { suffix }
    }

    /// Find a download URL for the repository's plugin package.
    ///
    /// `Ok(None)` means neither a release asset nor the conventional path exists.
    pub async fn resolve<A: RepositoryApi + ?Sized>(
        &self,
        api: &A,
        repo: &RepoRef,
        info: &RepositoryInfo,
    ) -> Result<Option<String>, EnrichmentError> {
        match api.list_release_assets(repo).await {
            Ok(assets) => {
                let suffix = self.suffix.to_lowercase();
                if let Some(asset) = assets
                    .into_iter()
                    .find(|a| a.name.to_lowercase().ends_with(&suffix))
                {
                    return Ok(Some(asset.download_url));
                }
            }
            Err(e) => tracing::debug!("{}: could not list releases: {}", repo, e),
        }

        let url = self.conventional_url(api.site_base(), repo, info);
        if api.url_exists(&url).await? {
            return Ok(Some(url));
        }
        Ok(None)
    }

    /// `<site>/<owner>/<repo>/raw/<branch>/Release/<name>.<ext>`
    pub fn conventional_url(&self, site_base: &str, repo: &RepoRef, info: &RepositoryInfo) -> String {
        format!(
            "{}/{}/{}/raw/{}/Release/{}{}",
            site_base.trim_end_matches('/'),
            repo.owner,
            repo.repo,
            info.default_branch,
            info.name,
            self.suffix
        )
    }
}
