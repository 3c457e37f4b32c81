//! Application-level utilities for the Sealnotes CLI.
//!
//! This module provides:
//! - Path, owner and page-size resolution from flags, env and config
//! - The application context that opens the store once per invocation

mod context;
mod resolver;

// Re-export public API
pub use context::AppContext;
pub use resolver::resolve_config_path;
