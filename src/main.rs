//! Catalogue Enricher - fills missing plugin metadata from GitHub.
//!
//! Reads a JSON catalogue of plugins keyed by identifier, looks up each
//! entry's GitHub repository, and fills in display name, author,
//! description, icon and download URL where they are missing.

pub mod catalogue;
pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(format!("catalogue_enricher={level}").parse()?))
        .init();

    cli::run_command(&args)
}
