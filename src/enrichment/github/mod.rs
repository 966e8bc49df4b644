//! GitHub API integration
//!
//! Repository metadata, release assets and owner avatars for catalogue
//! entries hosted on GitHub.
//!
//! API docs: https://docs.github.com/en/rest

pub mod dto;
mod adapter;
mod client;

pub use adapter::{to_release_assets, to_repository_info};
pub use client::{DEFAULT_API_BASE, DEFAULT_SITE_BASE, GithubClient};
