//! Error types for Sealnotes core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to exit codes and user-facing messages.

use thiserror::Error;

/// Result type alias for Sealnotes operations.
pub type Result<T> = std::result::Result<T, NoteError>;

/// Core error type for Sealnotes operations.
#[derive(Debug, Error)]
pub enum NoteError {
    /// Missing password, invalid transition or otherwise rejected request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Wrong key or tampered token
    #[error("Authentication failed: wrong key or tampered token")]
    AuthenticationFailure,

    /// Structurally malformed token or salt
    #[error("Malformed data: {0}")]
    Format(String),

    /// The original note could not be decrypted for recreation
    #[error("Decryption required: original content could not be decrypted")]
    DecryptionRequired,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Cryptographic primitive failure (RNG, key setup)
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },
}

impl NoteError {
    /// Whether this error belongs to the store failure family.
    pub fn is_storage(&self) -> bool {
        matches!(self, NoteError::Storage(_) | NoteError::Sqlite { .. })
    }
}
