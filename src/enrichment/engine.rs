//! Enrichment engine - walks a selection of catalogue records and fills
//! missing fields from the repository API.
//!
//! Per record, in selection order:
//! 1. Reconcile: skip complete records and records without a usable repository
//! 2. Fetch repository metadata (retrying through the rate-limit controller)
//! 3. Fill missing fields, resolve a download URL and fetch the icon if asked
//!
//! Records are mutated in place as they complete. A rate-limit abort or a
//! Ctrl-C stops the run before the current record is touched, so everything
//! before it stays applied and the report names the record to resume from.

use crate::catalogue::{Field, RecordStore};

use super::downloads::DownloadResolver;
use super::rate_limit::{AbortCause, RateLimitController, RateLimitDecision, RateLimitPolicy};
use super::reconciler::{Decision, ReconcileMode, SkipReason, apply_repository_info, reconcile};
use super::stats::{RecordOutcome, RunStatistics};
use super::traits::{Cooldown, IconStore, RepositoryApi};

/// Engine settings that don't change between runs
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub rate_limit: RateLimitPolicy,
    pub downloads: DownloadResolver,
}

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFlow {
    Continue(RecordOutcome),
    Halt(AbortCause),
}

/// Where and why a run stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Halt {
    /// First identifier that was not processed; resume from here
    pub at: String,
    pub cause: AbortCause,
}

/// Result of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub statistics: RunStatistics,
    /// Last identifier that reached a terminal outcome
    pub last_completed: Option<String>,
    /// Rate-limit cooldowns waited out during the run
    pub rate_limit_waits: u32,
    pub halted: Option<Halt>,
}

impl RunReport {
    pub fn halted_at(&self) -> Option<&str> {
        self.halted.as_ref().map(|h| h.at.as_str())
    }
}

/// Orchestrates reconciliation, lookups and rate limiting over a run.
pub struct EnrichmentEngine<'a, A: ?Sized, I: ?Sized, C: ?Sized> {
    api: &'a A,
    icons: &'a I,
    cooldown: &'a C,
    config: EngineConfig,
}

impl<'a, A, I, C> EnrichmentEngine<'a, A, I, C>
where
    A: RepositoryApi + ?Sized,
    I: IconStore + ?Sized,
    C: Cooldown + ?Sized,
{
    pub fn new(api: &'a A, icons: &'a I, cooldown: &'a C, config: EngineConfig) -> Self {
        Self {
            api,
            icons,
            cooldown,
            config,
        }
    }

    /// Enrich `ids` in order, mutating `store` in place.
    ///
    /// Never fails: per-record problems are counted, and a rate-limit abort
    /// or a stop request ends the run with a [`Halt`] in the report.
    pub async fn enrich(
        &self,
        ids: &[String],
        store: &mut RecordStore,
        mode: &ReconcileMode,
    ) -> RunReport {
        let mut controller = RateLimitController::new(self.config.rate_limit, self.cooldown);
        let mut report = RunReport::default();

        for (i, id) in ids.iter().enumerate() {
            let flow = if self.cooldown.stop_requested() {
                RecordFlow::Halt(AbortCause::Interrupted)
            } else {
                self.process_record(id, store, mode, &mut controller).await
            };

            match flow {
                RecordFlow::Continue(outcome) => {
                    report.statistics.record(outcome);
                    report.last_completed = Some(id.clone());
                }
                RecordFlow::Halt(cause) => {
                    tracing::error!("{}. Stopping further requests.", cause);
                    tracing::warn!("Stopped at plugin: {}", id);
                    report.halted = Some(Halt {
                        at: id.clone(),
                        cause,
                    });
                    break;
                }
            }

            if (i + 1) % 25 == 0 {
                tracing::info!("Processed {}/{} plugins", i + 1, ids.len());
            }
        }

        report.rate_limit_waits = controller.total_waits();
        report
    }

    async fn process_record(
        &self,
        id: &str,
        store: &mut RecordStore,
        mode: &ReconcileMode,
        controller: &mut RateLimitController<'_, C>,
    ) -> RecordFlow {
        let Some(entry) = store.get(id) else {
            tracing::warn!("{}: not in catalogue", id);
            return RecordFlow::Continue(RecordOutcome::Failed);
        };

        let icon_present = !mode.checks_icons() || self.icons.has_icon(id);

        let (repo, missing) = match reconcile(entry, icon_present, mode) {
            Decision::Skip(SkipReason::InvalidRepo) => {
                tracing::info!("{}: No GitHub repository found. Skipping.", id);
                return RecordFlow::Continue(RecordOutcome::InvalidRepo);
            }
            Decision::Skip(SkipReason::Complete) => {
                tracing::debug!("{}: Nothing missing. Skipping.", id);
                return RecordFlow::Continue(RecordOutcome::Skipped);
            }
            Decision::NeedsFetch { repo, missing } => (repo, missing),
        };

        tracing::debug!("{}: fetching {} (missing: {})", id, repo, missing.labels().join(", "));

        let info = loop {
            match self.api.fetch_repository(&repo).await {
                Ok(info) => {
                    controller.on_response();
                    break info;
                }
                Err(e) if e.is_rate_limited() => match controller.on_rate_limited().await {
                    RateLimitDecision::Retry => continue,
                    RateLimitDecision::Abort(cause) => return RecordFlow::Halt(cause),
                },
                Err(e) => {
                    controller.on_response();
                    tracing::warn!("{}: Failed to fetch repository info: {}", id, e);
                    return RecordFlow::Continue(RecordOutcome::Failed);
                }
            }
        };

        let download_url = if missing.download_url {
            match self.config.downloads.resolve(self.api, &repo, &info).await {
                Ok(url) => {
                    if url.is_none() {
                        tracing::debug!("{}: no downloadable package found", id);
                    }
                    url
                }
                Err(e) => {
                    tracing::warn!("{}: Could not resolve download URL: {}", id, e);
                    None
                }
            }
        } else {
            None
        };

        if missing.icon
            && let Err(e) = self.icons.fetch_icon(id, &info.owner).await
        {
            tracing::warn!("{}: Could not fetch icon: {}", id, e);
        }

        let Some(entry) = store.get_mut(id) else {
            return RecordFlow::Continue(RecordOutcome::Failed);
        };
        let mut changed = apply_repository_info(entry, &info, &missing, mode);
        if let Some(url) = download_url
            && entry.fill(Field::DownloadUrl, url)
        {
            changed.push(Field::DownloadUrl);
        }

        if changed.is_empty() {
            tracing::info!("{}: Done, nothing changed.", id);
        } else {
            let fields: Vec<_> = changed.iter().map(|f| f.key()).collect();
            tracing::info!("{}: Updated {}.", id, fields.join(", "));
        }

        RecordFlow::Continue(RecordOutcome::Succeeded)
    }
}
