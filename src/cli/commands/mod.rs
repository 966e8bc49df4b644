//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `enrich`: Fill missing catalogue fields from GitHub
//! - `check`: Offline report of what an enrichment run would do
//! - `config`: Write or print the configuration file

mod check;
mod config;
mod enrich;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

use crate::catalogue::{self, RecordStore};
use crate::config::Config;
use crate::enrichment::{ReconcileMode, Selection};
use crate::error::{self, ResultExt};

pub use check::cmd_check;
pub use config::{cmd_config_init, cmd_config_show};
pub use enrich::cmd_enrich;

/// Catalogue Enricher CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill missing plugin metadata from GitHub
    Enrich {
        #[command(flatten)]
        selection: SelectionArgs,
        #[command(flatten)]
        paths: PathArgs,
        #[command(flatten)]
        mode: ModeArgs,
        /// Sleep and retry when rate limited instead of stopping
        #[arg(long)]
        wait_on_rate_limit: bool,
        /// Stop after this many consecutive rate-limit waits
        #[arg(long, value_name = "N")]
        max_waits: Option<u32>,
        /// GitHub token (or set GITHUB_TOKEN env var)
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Run without writing the catalogue or icons
        #[arg(long)]
        dry_run: bool,
    },
    /// Report what enrichment would do, without network access
    Check {
        #[command(flatten)]
        selection: SelectionArgs,
        #[command(flatten)]
        paths: PathArgs,
        #[command(flatten)]
        mode: ModeArgs,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

/// Which plugins to process
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Plugin identifiers to process (default: all)
    #[arg(value_name = "IDS", conflicts_with = "start_from")]
    pub ids: Vec<String>,
    /// Resume from this identifier, in catalogue order
    #[arg(long, value_name = "ID")]
    pub start_from: Option<String>,
}

impl SelectionArgs {
    pub fn selection(&self) -> Selection {
        if let Some(start) = &self.start_from {
            Selection::ResumeFrom(start.clone())
        } else if !self.ids.is_empty() {
            Selection::Subset(self.ids.clone())
        } else {
            Selection::All
        }
    }
}

/// File locations, overriding the config file
#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Catalogue JSON file
    #[arg(long, value_name = "PATH")]
    pub catalogue: Option<PathBuf>,
    /// Icon directory
    #[arg(long, value_name = "DIR")]
    pub icons: Option<PathBuf>,
}

impl PathArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(catalogue) = &self.catalogue {
            config.paths.catalogue = catalogue.clone();
        }
        if let Some(icons) = &self.icons {
            config.paths.icons = icons.clone();
        }
    }
}

/// Field mode flags
#[derive(Args, Debug, Clone, Default)]
pub struct ModeArgs {
    /// Overwrite existing descriptions from GitHub
    #[arg(long)]
    pub refresh_descriptions: bool,
    /// Only look at descriptions; ignore other fields and icons
    #[arg(long)]
    pub descriptions_only: bool,
    /// Also fill missing download URLs
    #[arg(long)]
    pub resolve_downloads: bool,
}

impl ModeArgs {
    pub fn mode(&self, config: &Config) -> ReconcileMode {
        let mut mode = ReconcileMode::default();
        if self.refresh_descriptions {
            mode = mode.refresh_descriptions();
        }
        if self.descriptions_only {
            mode = mode.descriptions_only();
        }
        if self.resolve_downloads || config.enrichment.resolve_downloads {
            mode = mode.with_downloads();
        }
        mode
    }
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let mut config = crate::config::load();

    match &cli.command {
        Commands::Enrich {
            selection,
            paths,
            mode,
            wait_on_rate_limit,
            max_waits,
            token,
            dry_run,
        } => {
            paths.apply(&mut config);
            if *wait_on_rate_limit {
                config.enrichment.wait_on_rate_limit = true;
            }
            if max_waits.is_some() {
                config.enrichment.max_rate_limit_waits = *max_waits;
            }
            if token.is_some() {
                config.github.token = token.clone();
            }

            let rt = Runtime::new()?;
            let mode = mode.mode(&config);
            cmd_enrich(&rt, &config, &selection.selection(), &mode, *dry_run)
        }
        Commands::Check {
            selection,
            paths,
            mode,
        } => {
            paths.apply(&mut config);
            let mode = mode.mode(&config);
            cmd_check(&config, &selection.selection(), &mode)
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => cmd_config_init(*force),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Load the catalogue, naming the file in any error
pub(crate) fn load_catalogue(path: &Path) -> error::Result<RecordStore> {
    catalogue::load(path).with_context(format!("loading {}", path.display()))
}

/// Save the catalogue atomically, naming the file in any error
pub(crate) fn save_catalogue(path: &Path, store: &RecordStore) -> error::Result<()> {
    catalogue::save(path, store).with_context(format!("saving {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_enrich_defaults() {
        let cli = Cli::try_parse_from(["catalogue-enricher", "enrich"]).unwrap();
        let Commands::Enrich {
            selection,
            mode,
            dry_run,
            wait_on_rate_limit,
            ..
        } = cli.command
        else {
            panic!("expected enrich");
        };
        assert_eq!(selection.selection(), Selection::All);
        assert_eq!(mode.mode(&Config::default()), ReconcileMode::default());
        assert!(!dry_run);
        assert!(!wait_on_rate_limit);
    }

    #[test]
    fn test_enrich_subset_and_flags() {
        let cli = Cli::try_parse_from([
            "catalogue-enricher",
            "-v",
            "enrich",
            "com.a",
            "com.b",
            "--refresh-descriptions",
            "--max-waits",
            "3",
            "--catalogue",
            "plugins.json",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Enrich {
            selection,
            mode,
            max_waits,
            paths,
            ..
        } = cli.command
        else {
            panic!("expected enrich");
        };
        assert_eq!(
            selection.selection(),
            Selection::Subset(vec!["com.a".into(), "com.b".into()])
        );
        assert_eq!(
            mode.mode(&Config::default()),
            ReconcileMode::default().refresh_descriptions()
        );
        assert_eq!(max_waits, Some(3));
        assert_eq!(paths.catalogue, Some(PathBuf::from("plugins.json")));
    }

    #[test]
    fn test_start_from_conflicts_with_ids() {
        let result = Cli::try_parse_from([
            "catalogue-enricher",
            "enrich",
            "com.a",
            "--start-from",
            "com.b",
        ]);
        assert!(result.is_err());

        let cli =
            Cli::try_parse_from(["catalogue-enricher", "check", "--start-from", "com.b"]).unwrap();
        let Commands::Check { selection, .. } = cli.command else {
            panic!("expected check");
        };
        assert_eq!(selection.selection(), Selection::ResumeFrom("com.b".into()));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["catalogue-enricher", "enrich", "--bogus"]).is_err());
    }

    #[test]
    fn test_config_resolve_downloads_applies_to_mode() {
        let mut config = Config::default();
        config.enrichment.resolve_downloads = true;
        assert!(ModeArgs::default().mode(&config).resolve_downloads);
    }

    #[test]
    fn test_path_args_override_config() {
        let mut config = Config::default();
        PathArgs {
            catalogue: Some(PathBuf::from("/tmp/c.json")),
            icons: None,
        }
        .apply(&mut config);
        assert_eq!(config.paths.catalogue, PathBuf::from("/tmp/c.json"));
        assert_eq!(config.paths.icons, PathBuf::from("icons"));
    }
}
