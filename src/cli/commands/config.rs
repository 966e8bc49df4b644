//! Configuration file commands.

use crate::config::{self, Config, ConfigError};
use crate::error::Error;

/// Write the default configuration to the standard location.
pub fn cmd_config_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path().ok_or(Error::Config(ConfigError::NoConfigDir))?;
    if path.exists() && !force {
        return Err(Error::Config(ConfigError::AlreadyExists(path)).into());
    }

    let written = config::save(&Config::default()).map_err(Error::from)?;
    println!("Wrote default configuration to {}", written.display());
    Ok(())
}

/// Print the effective configuration as TOML.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    let shown = redacted(config);
    if let Some(path) = config::config_path() {
        println!("# {}", path.display());
    }
    print!("{}", config::to_toml(&shown).map_err(Error::from)?);
    Ok(())
}

fn redacted(config: &Config) -> Config {
    let mut shown = config.clone();
    if shown.github.token.is_some() {
        shown.github.token = Some("********".to_string());
    }
    shown
}
