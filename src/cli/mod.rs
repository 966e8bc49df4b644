//! Command-line interface for catalogue-enricher.
//!
//! This module provides CLI commands for enriching and checking a plugin
//! catalogue and for managing the configuration file.

mod commands;

pub use commands::{Cli, Commands, ConfigAction, run_command};
