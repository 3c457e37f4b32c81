//! Input helper functions for the CLI.
//!
//! This module provides utilities for:
//! - Password resolution from flags, env and prompts
//! - Reading note content from stdin

mod input;

// Re-export public API
pub use input::{read_content, read_stdin_content, resolve_password, resolve_secret};
