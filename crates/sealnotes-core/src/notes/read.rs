//! Read-path decryption.
//!
//! Resolving a record never fails. An encrypted note that cannot be opened
//! yields a [`ContentView::Locked`] or [`ContentView::Failed`] view, which
//! renders to sentinel text of the form `"[Encrypted content - <detail>]"`.
//! Deciding whether a sentinel is an error is left to the caller: it is one
//! only when a password was supplied.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::NoteError;
use crate::notes::seal::unseal;
use crate::notes::types::supplied;
use crate::storage::{NoteBody, NoteRecord};

/// Prefix shared by every sentinel string.
pub const SENTINEL_PREFIX: &str = "[Encrypted content";

/// Detail shown when no password was given.
pub const PASSWORD_REQUIRED: &str = "Password required to view";

/// Detail shown when an encrypted record has no salt.
pub const MISSING_SALT: &str = "Missing encryption salt";

/// Detail shown when the password does not open the note.
pub const INVALID_PASSWORD: &str = "Invalid decryption password";

/// Outcome of resolving a note's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentView {
    /// Plaintext, either stored as such or decrypted
    Resolved(String),

    /// Encrypted and no password was supplied
    Locked,

    /// Encrypted and decryption failed for the given reason
    Failed(String),
}

impl ContentView {
    /// Wire form: the plaintext or a sentinel.
    pub fn render(self) -> String {
        match self {
            ContentView::Resolved(text) => text,
            ContentView::Locked => sentinel(PASSWORD_REQUIRED),
            ContentView::Failed(detail) => sentinel(&detail),
        }
    }

    /// Whether the plaintext is available.
    pub fn is_resolved(&self) -> bool {
        matches!(self, ContentView::Resolved(_))
    }
}

fn sentinel(detail: &str) -> String {
    format!("{} - {}]", SENTINEL_PREFIX, detail)
}

/// Whether rendered content is sentinel text rather than note content.
pub fn is_sentinel(content: &str) -> bool {
    content.starts_with(SENTINEL_PREFIX)
}

/// Resolve a record's content with an optional password.
///
/// # Examples
///
/// ```
/// # use chrono::Utc;
/// # use sealnotes_core::notes::{resolve_content, ContentView};
/// # use sealnotes_core::sensitivity::NoteSensitivity;
/// # use sealnotes_core::storage::{NoteBody, NoteRecord};
/// let record = NoteRecord {
///     id: "n1".to_string(),
///     owner_id: "o1".to_string(),
///     title: "t".to_string(),
///     body: NoteBody::Plain("hello".to_string()),
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
///     sensitivity: NoteSensitivity::default(),
/// };
/// assert_eq!(resolve_content(&record, None), ContentView::Resolved("hello".to_string()));
/// ```
pub fn resolve_content(record: &NoteRecord, password: Option<&SecretString>) -> ContentView {
    let sealed = match &record.body {
        NoteBody::Plain(text) => return ContentView::Resolved(text.clone()),
        NoteBody::Sealed(sealed) => sealed,
    };

    let Some(password) = supplied(password) else {
        return ContentView::Locked;
    };

    let Some(salt) = sealed.salt.as_deref() else {
        debug!(note_id = %record.id, "encrypted note has no salt");
        return ContentView::Failed(MISSING_SALT.to_string());
    };

    match unseal(&sealed.token, salt, password.expose_secret()) {
        Ok(plaintext) => ContentView::Resolved(plaintext),
        Err(err) => {
            debug!(note_id = %record.id, error = %err, "note decryption failed");
            ContentView::Failed(failure_detail(&err))
        }
    }
}

fn failure_detail(err: &NoteError) -> String {
    match err {
        NoteError::AuthenticationFailure => INVALID_PASSWORD.to_string(),
        NoteError::Format(detail) => {
            format!("Decryption failed due to format issues: {}", detail)
        }
        other => format!("Decryption failed: {}", other),
    }
}
