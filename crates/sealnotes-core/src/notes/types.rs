//! Request and response types exchanged with the boundary layer.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::sensitivity::NoteSensitivity;
use crate::storage::NoteRecord;

/// Input for creating a note.
#[derive(Debug)]
pub struct NoteCreate {
    pub title: String,
    pub content: String,
    pub is_encrypted: bool,

    /// Required when `is_encrypted` is set
    pub encryption_password: Option<SecretString>,
}

/// Partial update of a note. `None` leaves a field as it is.
#[derive(Debug, Default)]
pub struct NoteUpdate {
    pub title: Option<String>,

    /// New plaintext content
    pub content: Option<String>,

    /// Target encryption disposition
    pub is_encrypted: Option<bool>,

    /// Password to encrypt with (and, without `old_encryption_password`, the
    /// current password of an encrypted note)
    pub encryption_password: Option<SecretString>,

    /// Current password of an encrypted note when rotating to a new one
    pub old_encryption_password: Option<SecretString>,
}

/// Input for cloning a note under a new encryption disposition.
///
/// Title and content default to the original note's resolved values.
#[derive(Debug, Default)]
pub struct NoteRecreate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_encrypted: bool,
    pub encryption_password: Option<SecretString>,
}

/// A note as returned to callers.
///
/// `content` is plaintext, or sentinel text when an encrypted note was not
/// (or could not be) decrypted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub is_encrypted: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sensitivity: NoteSensitivity,
}

impl Note {
    pub(crate) fn from_record(record: &NoteRecord, content: String) -> Self {
        Self {
            id: record.id.clone(),
            owner_id: record.owner_id.clone(),
            title: record.title.clone(),
            content,
            is_encrypted: record.is_encrypted(),
            salt: record.body.salt().map(str::to_string),
            created_at: record.created_at,
            updated_at: record.updated_at,
            sensitivity: record.sensitivity.clone(),
        }
    }
}

/// A password that was actually given; empty strings count as absent.
pub(crate) fn supplied(password: Option<&SecretString>) -> Option<&SecretString> {
    password.filter(|secret| !secret.expose_secret().is_empty())
}
