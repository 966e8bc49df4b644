//! Catalogue enrichment command.

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::enrichment::{
    DirectoryIconStore, DownloadResolver, EngineConfig, EnrichmentEngine, GithubClient,
    ReconcileMode, RunReport, Selection, TokioCooldown, selector,
};
use crate::error::Error;

use super::{load_catalogue, save_catalogue};

/// Enrich the selected catalogue entries and write the catalogue back.
///
/// Selection errors abort before any request is made and leave the file
/// untouched. A rate-limit halt or a single Ctrl-C still saves the progress
/// made so far.
pub fn cmd_enrich(
    rt: &Runtime,
    config: &Config,
    selection: &Selection,
    mode: &ReconcileMode,
    dry_run: bool,
) -> anyhow::Result<()> {
    let path = &config.paths.catalogue;
    let mut store = load_catalogue(path)?;
    let ids = selector::resolve(&store, selection).map_err(Error::from)?;

    if ids.is_empty() {
        println!("No plugins selected.");
        return Ok(());
    }

    if config.github.token.is_none() {
        tracing::warn!("No GitHub token set; unauthenticated requests are limited to 60 per hour");
    }

    let client = GithubClient::new(config.github.token.as_deref())
        .with_base_urls(&config.github.api_base, &config.github.site_base);
    let icons = DirectoryIconStore::new(&config.paths.icons, client.clone()).dry_run(dry_run);

    println!("Enriching {} plugins from {:?}", ids.len(), path);
    let report = rt.block_on(async {
        let engine_config = EngineConfig {
            rate_limit: config.enrichment.rate_limit_policy(),
            downloads: DownloadResolver::new(&config.enrichment.package_suffix),
        };
        let cooldown = TokioCooldown::listen();
        let engine = EnrichmentEngine::new(&client, &icons, &cooldown, engine_config);
        engine.enrich(&ids, &mut store, mode).await
    });

    if dry_run {
        println!("Dry run - catalogue not written.");
    } else {
        save_catalogue(path, &store)?;
        tracing::info!("Saved catalogue to {:?}", path);
    }

    print!("{}", format_report(&report));
    Ok(())
}

fn format_report(report: &RunReport) -> String {
    let mut out = format!("\n{}\n", report.statistics);

    if report.rate_limit_waits > 0 {
        out.push_str(&format!("Rate-limit waits: {}\n", report.rate_limit_waits));
    }
    if let Some(last) = &report.last_completed {
        out.push_str(&format!("Last completed: {last}\n"));
    }
    if let Some(halt) = &report.halted {
        out.push_str(&format!("\nStopped early: {}\n", halt.cause));
        out.push_str(&format!(
            "Resume with: catalogue-enricher enrich --start-from {}\n",
            halt.at
        ));
    }
    out
}
