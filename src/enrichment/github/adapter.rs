//! Adapter layer: Convert GitHub DTOs to domain models
//!
//! This is the ONLY place where GitHub DTO types are converted to domain types.

use super::dto;
use crate::enrichment::domain::{EnrichmentError, ReleaseAsset, RepositoryInfo};

/// Branch assumed when GitHub doesn't report one
const FALLBACK_BRANCH: &str = "main";

/// Convert a repository response to our domain type.
///
/// A response without a repository name or owner is unusable and reported
/// as an invalid response rather than filled with blanks.
pub fn to_repository_info(
    response: dto::RepositoryResponse,
) -> Result<RepositoryInfo, EnrichmentError> {
    if response.name.trim().is_empty() {
        return Err(EnrichmentError::InvalidResponse(
            "repository name is empty".to_string(),
        ));
    }
    if response.owner.login.trim().is_empty() {
        return Err(EnrichmentError::InvalidResponse(
            "owner login is empty".to_string(),
        ));
    }

    Ok(RepositoryInfo {
        name: response.name,
        owner: response.owner.login,
        description: response.description,
        default_branch: response
            .default_branch
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| FALLBACK_BRANCH.to_string()),
    })
}

/// Flatten published releases into their assets, newest release first.
///
/// Drafts are skipped: their download URLs aren't public.
pub fn to_release_assets(releases: Vec<dto::Release>) -> Vec<ReleaseAsset> {
    releases
        .into_iter()
        .filter(|r| !r.draft)
        .flat_map(|r| r.assets)
        .map(|a| ReleaseAsset {
            name: a.name,
            download_url: a.browser_download_url,
        })
        .collect()
}
