//! Catalogue enrichment - fills missing plugin metadata from GitHub.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **API DTOs** (`github/dto.rs`) - Exact API response shapes
//! - **Adapters** (`github/adapter.rs`) - Convert DTOs to domain models
//! - **Clients** (`github/client.rs`) - HTTP client for the GitHub REST API
//! - **Traits** (`traits.rs`) - Collaborator seams, with mocks for tests
//! - **Reconciler** - Decides per record whether a lookup is needed
//! - **Rate limit** - Per-run fail-fast / wait-and-retry state machine
//! - **Engine** - Orchestrates a run over selected records
//!
//! # Usage
//!
//! ```ignore
//! use enrichment::{EnrichmentEngine, EngineConfig, GithubClient, ReconcileMode, TokioCooldown};
//!
//! let client = GithubClient::new(token.as_deref());
//! let icons = DirectoryIconStore::new("icons", client.clone());
//! let cooldown = TokioCooldown::listen();
//! let engine = EnrichmentEngine::new(&client, &icons, &cooldown, EngineConfig::default());
//!
//! let ids = selector::resolve(&store, &Selection::All)?;
//! let report = engine.enrich(&ids, &mut store, &ReconcileMode::default()).await;
//! println!("{}", report.statistics);
//! ```

pub mod domain;
pub mod downloads;
pub mod engine;
pub mod github;
pub mod icons;
pub mod naming;
pub mod rate_limit;
pub mod reconciler;
pub mod selector;
pub mod stats;
pub mod traits;

pub use domain::{EnrichmentError, ReleaseAsset, RepoRef, RepositoryInfo};
pub use downloads::{DEFAULT_PACKAGE_SUFFIX, DownloadResolver};
pub use engine::{EngineConfig, EnrichmentEngine, Halt, RunReport};
pub use github::{DEFAULT_API_BASE, DEFAULT_SITE_BASE, GithubClient};
pub use icons::DirectoryIconStore;
pub use rate_limit::{AbortCause, DEFAULT_COOLDOWN, RateLimitPolicy, TokioCooldown};
pub use reconciler::{Decision, DescriptionMode, FieldScope, ReconcileMode, SkipReason, reconcile};
pub use selector::{Selection, SelectionError};
pub use stats::{RecordOutcome, RunStatistics};
