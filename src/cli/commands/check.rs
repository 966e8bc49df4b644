//! Offline catalogue check.

use std::path::Path;

use crate::catalogue::RecordStore;
use crate::config::Config;
use crate::enrichment::{Decision, ReconcileMode, Selection, SkipReason, reconcile, selector};
use crate::error::Error;

use super::load_catalogue;

/// What a run would do with the selected entries, per entry plus totals.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub needs_fetch: usize,
    pub complete: usize,
    pub invalid_repo: usize,
}

/// Print what an enrichment run would do, without touching the network.
pub fn cmd_check(config: &Config, selection: &Selection, mode: &ReconcileMode) -> anyhow::Result<()> {
    let store = load_catalogue(&config.paths.catalogue)?;
    let ids = selector::resolve(&store, selection).map_err(Error::from)?;

    let summary = check_entries(&store, &ids, &config.paths.icons, mode, |line| {
        println!("{line}")
    });

    println!();
    println!("Needs fetch:  {}", summary.needs_fetch);
    println!("Complete:     {}", summary.complete);
    println!("Invalid repo: {}", summary.invalid_repo);
    Ok(())
}

fn check_entries(
    store: &RecordStore,
    ids: &[String],
    icons: &Path,
    mode: &ReconcileMode,
    mut report: impl FnMut(String),
) -> CheckSummary {
    let mut summary = CheckSummary::default();

    for id in ids {
        let Some(entry) = store.get(id) else {
            continue;
        };
        let icon_present = !mode.checks_icons() || icons.join(format!("{id}.png")).exists();

        match reconcile(entry, icon_present, mode) {
            Decision::Skip(SkipReason::InvalidRepo) => {
                summary.invalid_repo += 1;
                report(format!(
                    "{id}: invalid repository ({})",
                    entry.repository().unwrap_or("none")
                ));
            }
            Decision::Skip(SkipReason::Complete) => {
                summary.complete += 1;
                report(format!("{id}: complete"));
            }
            Decision::NeedsFetch { repo, missing } => {
                summary.needs_fetch += 1;
                report(format!("{id}: fetch {repo} (missing: {})", missing.labels().join(", ")));
            }
        }
    }

    summary
}
