//! Core data types for the storage layer.

use std::collections::BTreeMap;

use chrono::{DateTime, SubsecRound, Utc};

use crate::sensitivity::NoteSensitivity;

/// A persisted record as a flat map of field name to text value.
pub type FieldMap = BTreeMap<String, String>;

/// Content of an encrypted note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedContent {
    /// Cipher token produced under this note's salt
    pub token: String,

    /// Base64 salt. Always set by the write path; `None` only for damaged
    /// legacy records, which the read path reports instead of decrypting.
    pub salt: Option<String>,
}

/// Note content, either plaintext or sealed.
///
/// Pairing the salt with the token makes "encrypted flag with plaintext" and
/// "plaintext with a salt" unrepresentable for records built by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteBody {
    Plain(String),
    Sealed(SealedContent),
}

impl NoteBody {
    pub fn is_encrypted(&self) -> bool {
        matches!(self, NoteBody::Sealed(_))
    }

    pub fn salt(&self) -> Option<&str> {
        match self {
            NoteBody::Plain(_) => None,
            NoteBody::Sealed(sealed) => sealed.salt.as_deref(),
        }
    }

    /// The stored `content` field: plaintext or cipher token.
    pub fn stored_content(&self) -> &str {
        match self {
            NoteBody::Plain(text) => text,
            NoteBody::Sealed(sealed) => &sealed.token,
        }
    }
}

/// A stored note.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRecord {
    /// Unique identifier (UUID v4 text)
    pub id: String,

    /// Owner this note belongs to
    pub owner_id: String,

    pub title: String,

    pub body: NoteBody,

    /// When this note was created
    pub created_at: DateTime<Utc>,

    /// Last update; never moves backwards for a given note
    pub updated_at: DateTime<Utc>,

    pub sensitivity: NoteSensitivity,
}

impl NoteRecord {
    pub fn is_encrypted(&self) -> bool {
        self.body.is_encrypted()
    }

    /// Owner-index score for this record (fractional Unix seconds).
    pub fn index_score(&self) -> f64 {
        timestamp_score(&self.updated_at)
    }
}

/// Convert a timestamp into an owner-index score.
pub fn timestamp_score(at: &DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / 1_000_000.0
}

/// Current time at the precision of owner-index scores (microseconds).
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Next `updated_at` for a record last touched at `previous`.
///
/// Clamped so that a clock step backwards never reorders a note's history.
pub fn next_timestamp(previous: &DateTime<Utc>) -> DateTime<Utc> {
    let now = current_timestamp();
    if now < *previous {
        *previous
    } else {
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_body_accessors() {
        let plain = NoteBody::Plain("hello".to_string());
        assert!(!plain.is_encrypted());
        assert_eq!(plain.salt(), None);
        assert_eq!(plain.stored_content(), "hello");

        let sealed = NoteBody::Sealed(SealedContent {
            token: "dG9rZW4=".to_string(),
            salt: Some("c2FsdA==".to_string()),
        });
        assert!(sealed.is_encrypted());
        assert_eq!(sealed.salt(), Some("c2FsdA=="));
        assert_eq!(sealed.stored_content(), "dG9rZW4=");
    }

    #[test]
    fn test_next_timestamp_never_goes_backwards() {
        let future = Utc::now() + Duration::hours(1);
        assert_eq!(next_timestamp(&future), future);

        let past = Utc::now() - Duration::hours(1);
        assert!(next_timestamp(&past) > past);
    }

    #[test]
    fn test_current_timestamp_has_micro_precision() {
        let now = current_timestamp();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_score_orders_like_timestamps() {
        let earlier = Utc::now();
        let later = earlier + Duration::milliseconds(5);
        assert!(timestamp_score(&later) > timestamp_score(&earlier));
    }
}
