//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, used by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const FAILURE: i32 = 1;

    /// Note not found for this owner.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or rejected transition.
    pub const INVALID_INPUT: i32 = 4;

    /// A supplied password did not open the note.
    pub const AUTH_FAILED: i32 = 5;

    /// The original note must be decrypted before it can be recreated.
    pub const DECRYPTION_REQUIRED: i32 = 6;
}

/// Owner used when neither flags nor config name one.
pub const DEFAULT_OWNER: &str = "local";

/// Log filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default page size for `list`.
pub const DEFAULT_PAGE_SIZE: usize = 20;
