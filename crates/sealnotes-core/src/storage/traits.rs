//! Note store trait definition.
//!
//! The `NoteStore` trait defines the interface that all storage backends
//! must implement: a flat field map per note plus, per owner, an index of
//! note ids ordered by last update.

use crate::error::Result;
use crate::storage::types::FieldMap;

/// A single write inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Replace the note's whole field map (fields not listed are dropped).
    PutRecord { note_id: String, fields: FieldMap },

    /// Remove the note's field map.
    DeleteRecord { note_id: String },

    /// Insert the note into the owner's index or move it to a new score.
    IndexUpsert {
        owner_id: String,
        note_id: String,
        score: f64,
    },

    /// Remove the note from the owner's index.
    IndexRemove { owner_id: String, note_id: String },
}

/// Writes that belong to one logical transition.
///
/// A batch is applied all-or-nothing: readers observe either none or all of
/// its operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_record(mut self, note_id: impl Into<String>, fields: FieldMap) -> Self {
        self.ops.push(WriteOp::PutRecord {
            note_id: note_id.into(),
            fields,
        });
        self
    }

    pub fn delete_record(mut self, note_id: impl Into<String>) -> Self {
        self.ops.push(WriteOp::DeleteRecord {
            note_id: note_id.into(),
        });
        self
    }

    pub fn index_upsert(
        mut self,
        owner_id: impl Into<String>,
        note_id: impl Into<String>,
        score: f64,
    ) -> Self {
        self.ops.push(WriteOp::IndexUpsert {
            owner_id: owner_id.into(),
            note_id: note_id.into(),
            score,
        });
        self
    }

    pub fn index_remove(mut self, owner_id: impl Into<String>, note_id: impl Into<String>) -> Self {
        self.ops.push(WriteOp::IndexRemove {
            owner_id: owner_id.into(),
            note_id: note_id.into(),
        });
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Storage backend interface for notes.
///
/// All implementations must ensure:
/// - `apply` is atomic: a failed batch leaves the previous state intact
/// - Owner ranges are ordered by score descending, ties by note id descending
/// - Handles are shareable across threads (`&self` everywhere)
pub trait NoteStore: Send + Sync {
    /// Fetch a note's field map.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(fields))` if found, `Ok(None)` if not found.
    fn fetch_record(&self, note_id: &str) -> Result<Option<FieldMap>>;

    /// Note ids of one owner, most recently updated first.
    ///
    /// `skip` and `limit` are rank offsets, as used for pagination.
    fn owner_range(&self, owner_id: &str, skip: usize, limit: usize) -> Result<Vec<String>>;

    /// Number of notes in the owner's index.
    fn owner_count(&self, owner_id: &str) -> Result<usize>;

    /// Apply a batch atomically.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend rejects the batch; in that case
    /// none of its operations are visible.
    fn apply(&self, batch: WriteBatch) -> Result<()>;
}
