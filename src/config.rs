//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\catalogue-enricher\config.toml
//! - macOS: ~/Library/Application Support/catalogue-enricher/config.toml
//! - Linux: ~/.config/catalogue-enricher/config.toml
//!
//! The config file is human-readable and editable. Command-line flags and
//! the `GITHUB_TOKEN` environment variable take precedence over it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::enrichment::{
    DEFAULT_API_BASE, DEFAULT_COOLDOWN, DEFAULT_PACKAGE_SUFFIX, DEFAULT_SITE_BASE,
    RateLimitPolicy,
};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub access
    pub github: GithubConfig,

    /// Enrichment run behaviour
    pub enrichment: EnrichmentConfig,

    /// Catalogue and icon locations
    pub paths: PathsConfig,
}

/// GitHub API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Personal access token; raises the hourly request quota
    pub token: Option<String>,

    /// REST API base URL
    pub api_base: String,

    /// Website base URL, used for raw file probes
    pub site_base: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            site_base: DEFAULT_SITE_BASE.to_string(),
        }
    }
}

/// Enrichment settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Sleep and retry on rate limit instead of stopping the run
    pub wait_on_rate_limit: bool,

    /// Seconds to sleep per rate-limit wait
    pub cooldown_secs: u64,

    /// Give up after this many consecutive waits (unset = never)
    pub max_rate_limit_waits: Option<u32>,

    /// File suffix of downloadable plugin packages
    pub package_suffix: String,

    /// Fill `downloadURL` when it is missing
    pub resolve_downloads: bool,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            wait_on_rate_limit: false,
            cooldown_secs: DEFAULT_COOLDOWN.as_secs(),
            max_rate_limit_waits: None,
            package_suffix: DEFAULT_PACKAGE_SUFFIX.to_string(),
            resolve_downloads: false,
        }
    }
}

impl EnrichmentConfig {
    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        if self.wait_on_rate_limit {
            RateLimitPolicy::WaitAndRetry {
                cooldown: Duration::from_secs(self.cooldown_secs),
                max_waits: self.max_rate_limit_waits,
            }
        } else {
            RateLimitPolicy::FailFast
        }
    }
}

/// File locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Catalogue JSON file
    pub catalogue: PathBuf,

    /// Directory of `<id>.png` icons
    pub icons: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            catalogue: PathBuf::from("catalogue.json"),
            icons: PathBuf::from("icons"),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("catalogue-enricher"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from a specific file, with the same fallbacks as [`load`].
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the standard location
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(&path, config)?;
    Ok(path)
}

/// Save configuration to a specific file
pub fn save_to(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = to_toml(config)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

/// Render configuration as pretty TOML.
pub fn to_toml(config: &Config) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(ConfigError::Serialize)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Config file already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = to_toml(&config).unwrap();
        assert!(toml.contains("[github]"));
        assert!(toml.contains("[enrichment]"));
        assert!(toml.contains("[paths]"));
        assert!(toml.contains("cooldown_secs = 300"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.enrichment.wait_on_rate_limit = true;
        config.enrichment.max_rate_limit_waits = Some(3);
        config.paths.catalogue = PathBuf::from("/data/plugins.json");

        let toml = to_toml(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[enrichment]
wait_on_rate_limit = true
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert!(config.enrichment.wait_on_rate_limit);

        assert_eq!(config.enrichment.cooldown_secs, 300);
        assert_eq!(config.enrichment.package_suffix, ".streamDeckPlugin");
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.paths.icons, PathBuf::from("icons"));
    }

    #[test]
    fn test_rate_limit_policy_from_config() {
        let mut enrichment = EnrichmentConfig::default();
        assert_eq!(enrichment.rate_limit_policy(), RateLimitPolicy::FailFast);

        enrichment.wait_on_rate_limit = true;
        enrichment.cooldown_secs = 60;
        enrichment.max_rate_limit_waits = Some(2);
        assert_eq!(
            enrichment.rate_limit_policy(),
            RateLimitPolicy::WaitAndRetry {
                cooldown: Duration::from_secs(60),
                max_waits: Some(2),
            }
        );
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.enrichment.resolve_downloads = true;

        save_to(&path, &config).unwrap();

        assert_eq!(load_from(&path), config);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is [not toml").unwrap();

        assert_eq!(load_from(&path), Config::default());
        assert_eq!(load_from(&dir.path().join("missing.toml")), Config::default());
    }
}
