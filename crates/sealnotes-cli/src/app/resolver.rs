//! Resolution of store path, owner and page size.
//!
//! Precedence everywhere: command-line flag or environment variable, then
//! the config file, then a built-in default.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::{default_config_path, default_store_path, SealnotesConfig};
use crate::constants::{DEFAULT_OWNER, DEFAULT_PAGE_SIZE};

/// Resolve the config file path, checking SEALNOTES_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("SEALNOTES_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the note store path.
pub fn resolve_store_path(cli: &Cli, config: &SealnotesConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = non_empty(cli.store.as_deref()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = non_empty(config.store.path.as_deref()) {
        return Ok(PathBuf::from(path));
    }
    default_store_path()
}

/// Resolve the owner whose notes are managed.
pub fn resolve_owner(cli: &Cli, config: &SealnotesConfig) -> String {
    non_empty(cli.owner.as_deref())
        .or_else(|| non_empty(config.notes.owner.as_deref()))
        .unwrap_or(DEFAULT_OWNER)
        .to_string()
}

/// Resolve the `list` page size.
pub fn resolve_page_size(requested: Option<usize>, config: &SealnotesConfig) -> usize {
    requested
        .or(config.notes.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
