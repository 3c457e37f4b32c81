//! In-memory note store for tests and throwaway sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::error::{NoteError, Result};
use crate::storage::traits::{NoteStore, WriteBatch, WriteOp};
use crate::storage::types::FieldMap;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    records: HashMap<String, FieldMap>,
    indexes: HashMap<String, HashMap<String, f64>>,
}

impl MemoryState {
    fn apply_op(&mut self, op: WriteOp) -> Result<()> {
        match op {
            WriteOp::PutRecord { note_id, fields } => {
                self.records.insert(note_id, fields);
            }
            WriteOp::DeleteRecord { note_id } => {
                self.records.remove(&note_id);
            }
            WriteOp::IndexUpsert {
                owner_id,
                note_id,
                score,
            } => {
                if !score.is_finite() {
                    return Err(NoteError::Storage(format!(
                        "Index score for {} is not finite",
                        note_id
                    )));
                }
                self.indexes
                    .entry(owner_id)
                    .or_default()
                    .insert(note_id, score);
            }
            WriteOp::IndexRemove { owner_id, note_id } => {
                if let Some(index) = self.indexes.get_mut(&owner_id) {
                    index.remove(&note_id);
                    if index.is_empty() {
                        self.indexes.remove(&owner_id);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Note store held entirely in process memory.
///
/// Batches are staged on a copy of the state and swapped in on success.
/// [`MemoryNoteStore::reject_batches`] makes every following `apply` fail,
/// which lets callers check that a failed transition leaves nothing behind.
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    state: Mutex<MemoryState>,
    rejecting: AtomicBool,
    applied: AtomicUsize,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent batches fail (`true`) or succeed again (`false`).
    pub fn reject_batches(&self, reject: bool) {
        self.rejecting.store(reject, Ordering::SeqCst);
    }

    /// Number of batches committed so far.
    pub fn batches_applied(&self) -> usize {
        self.applied.load(Ordering::SeqCst)
    }

    /// Number of stored records across all owners.
    pub fn record_count(&self) -> Result<usize> {
        Ok(self.lock_state()?.records.len())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| NoteError::Storage("Memory store poisoned".to_string()))
    }
}

impl NoteStore for MemoryNoteStore {
    fn fetch_record(&self, note_id: &str) -> Result<Option<FieldMap>> {
        Ok(self.lock_state()?.records.get(note_id).cloned())
    }

    fn owner_range(&self, owner_id: &str, skip: usize, limit: usize) -> Result<Vec<String>> {
        let state = self.lock_state()?;
        let Some(index) = state.indexes.get(owner_id) else {
            return Ok(Vec::new());
        };

        let mut entries: Vec<(&String, f64)> = index.iter().map(|(id, score)| (id, *score)).collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.cmp(a.0)));

        Ok(entries
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|(id, _)| id.clone())
            .collect())
    }

    fn owner_count(&self, owner_id: &str) -> Result<usize> {
        Ok(self
            .lock_state()?
            .indexes
            .get(owner_id)
            .map_or(0, HashMap::len))
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        if self.rejecting.load(Ordering::SeqCst) {
            return Err(NoteError::Storage("Store rejected the batch".to_string()));
        }

        let mut state = self.lock_state()?;
        let mut staged = state.clone();
        for op in batch.into_ops() {
            staged.apply_op(op)?;
        }
        *state = staged;

        self.applied.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
