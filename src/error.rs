//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors ([`CatalogueError`], [`SelectionError`],
//!   [`ConfigError`]) for detailed handling
//!
//! Per-plugin lookup failures never surface here; the engine counts them
//! and moves on.
//!
//! [`CatalogueError`]: crate::catalogue::CatalogueError
//! [`SelectionError`]: crate::enrichment::SelectionError
//! [`ConfigError`]: crate::config::ConfigError

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing the catalogue failed
    #[error("Catalogue error: {0}")]
    Catalogue(#[from] crate::catalogue::CatalogueError),

    /// Bad identifier selection (unknown id or resume point)
    #[error("{0}")]
    Selection(#[from] crate::enrichment::SelectionError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, crate::catalogue::CatalogueError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Catalogue(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::CatalogueError;
    use crate::config::ConfigError;
    use crate::enrichment::SelectionError;

    #[test]
    fn test_config_error_display() {
        let err = Error::Config(ConfigError::AlreadyExists("/cfg/config.toml".into()));
        assert!(err.to_string().starts_with("Configuration error: "));
        assert!(err.to_string().contains("/cfg/config.toml"));
    }

    #[test]
    fn test_selection_error_converts() {
        let err: Error = SelectionError::UnknownIdentifier("com.x.y".into()).into();
        assert!(matches!(err, Error::Selection(_)));
        assert!(err.to_string().contains("com.x.y"));

        let wrapped = err.context("selecting plugins");
        assert!(wrapped.to_string().starts_with("selecting plugins: "));
    }

    #[test]
    fn test_result_ext() {
        let result: std::result::Result<(), CatalogueError> = Err(CatalogueError::Write(
            "catalogue.json.tmp".into(),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        ));
        let with_ctx = result.with_context("saving catalogue.json");
        let msg = with_ctx.unwrap_err().to_string();
        assert!(msg.starts_with("saving catalogue.json: "));
        assert!(msg.contains("denied"));
    }
}
