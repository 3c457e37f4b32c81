//! Conversion between note records and their flat stored form.
//!
//! Reads are lenient: records written by older versions may lack fields or
//! use other encodings, and a damaged field falls back to a conservative
//! default instead of failing the read.

use chrono::{DateTime, TimeZone, Utc};
use tracing::warn;

use crate::sensitivity::NoteSensitivity;
use crate::storage::types::{FieldMap, NoteBody, NoteRecord, SealedContent};

pub const FIELD_ID: &str = "id";
pub const FIELD_OWNER_ID: &str = "owner_id";
pub const FIELD_LEGACY_OWNER_ID: &str = "user_id";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_CONTENT: &str = "content";
pub const FIELD_IS_ENCRYPTED: &str = "is_encrypted";
pub const FIELD_SALT: &str = "salt";
pub const FIELD_CREATED_AT: &str = "created_at";
pub const FIELD_UPDATED_AT: &str = "updated_at";
pub const FIELD_SENSITIVITY_SCORE: &str = "sensitivity_score";
pub const FIELD_SENSITIVITY_EXPLANATION: &str = "sensitivity_explanation";

impl NoteRecord {
    /// Flatten into the stored field map.
    ///
    /// `salt` is written iff the body is sealed.
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert(FIELD_ID.to_string(), self.id.clone());
        fields.insert(FIELD_OWNER_ID.to_string(), self.owner_id.clone());
        fields.insert(FIELD_TITLE.to_string(), self.title.clone());
        fields.insert(
            FIELD_CONTENT.to_string(),
            self.body.stored_content().to_string(),
        );
        fields.insert(
            FIELD_IS_ENCRYPTED.to_string(),
            self.is_encrypted().to_string(),
        );
        if let Some(salt) = self.body.salt() {
            fields.insert(FIELD_SALT.to_string(), salt.to_string());
        }
        fields.insert(FIELD_CREATED_AT.to_string(), self.created_at.to_rfc3339());
        fields.insert(FIELD_UPDATED_AT.to_string(), self.updated_at.to_rfc3339());
        fields.insert(
            FIELD_SENSITIVITY_SCORE.to_string(),
            self.sensitivity.sensitivity_score.to_string(),
        );
        fields.insert(
            FIELD_SENSITIVITY_EXPLANATION.to_string(),
            self.sensitivity.explanation.clone(),
        );
        fields
    }

    /// Rebuild a record from its stored field map.
    ///
    /// The store key is authoritative for the id. Missing text fields become
    /// empty, unreadable timestamps become "now", a missing score becomes 0.
    pub fn from_fields(note_id: &str, fields: &FieldMap) -> NoteRecord {
        let text = |name: &str| fields.get(name).cloned().unwrap_or_default();

        let owner_id = fields
            .get(FIELD_OWNER_ID)
            .or_else(|| fields.get(FIELD_LEGACY_OWNER_ID))
            .cloned()
            .unwrap_or_default();

        let is_encrypted = fields
            .get(FIELD_IS_ENCRYPTED)
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let content = text(FIELD_CONTENT);
        let body = if is_encrypted {
            NoteBody::Sealed(SealedContent {
                token: content,
                salt: fields
                    .get(FIELD_SALT)
                    .filter(|salt| !salt.is_empty())
                    .cloned(),
            })
        } else {
            NoteBody::Plain(content)
        };

        let now = Utc::now();
        let created_at = parse_timestamp(fields.get(FIELD_CREATED_AT)).unwrap_or_else(|| {
            warn!(note_id, "stored created_at unreadable, using current time");
            now
        });
        let updated_at = parse_timestamp(fields.get(FIELD_UPDATED_AT)).unwrap_or(now);

        let sensitivity_score = fields
            .get(FIELD_SENSITIVITY_SCORE)
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map(|score| score.clamp(0, 100) as u8)
            .unwrap_or(0);

        NoteRecord {
            id: note_id.to_string(),
            owner_id,
            title: text(FIELD_TITLE),
            body,
            created_at,
            updated_at,
            sensitivity: NoteSensitivity {
                sensitivity_score,
                explanation: text(FIELD_SENSITIVITY_EXPLANATION),
            },
        }
    }
}

/// Parse RFC 3339, falling back to fractional Unix seconds.
fn parse_timestamp(value: Option<&String>) -> Option<DateTime<Utc>> {
    let raw = value?.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    let seconds: f64 = raw.parse().ok()?;
    if !seconds.is_finite() {
        return None;
    }
    let micros = (seconds * 1_000_000.0).round() as i64;
    Utc.timestamp_micros(micros).single()
}
