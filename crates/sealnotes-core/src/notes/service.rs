//! Note operations over a shared store.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{NoteError, Result};
use crate::notes::read::{resolve_content, ContentView};
use crate::notes::transition::{plan_create, plan_update};
use crate::notes::types::{Note, NoteCreate, NoteRecreate, NoteUpdate};
use crate::sensitivity::{score_content, DisabledScorer, SensitivityScorer};
use crate::storage::types::{current_timestamp, next_timestamp};
use crate::storage::{NoteRecord, NoteStore, WriteBatch};

/// Largest page `list_notes` returns.
pub const MAX_PAGE_SIZE: usize = 100;

/// Stateless note operations.
///
/// Cloning is cheap; clones share the store and scorer.
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
    scorer: Arc<dyn SensitivityScorer>,
}

impl NoteService {
    /// Service with sensitivity analysis disabled.
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self::with_scorer(store, Arc::new(DisabledScorer))
    }

    pub fn with_scorer(store: Arc<dyn NoteStore>, scorer: Arc<dyn SensitivityScorer>) -> Self {
        Self { store, scorer }
    }

    /// Create a note for `owner_id`.
    ///
    /// The returned note is rendered as a read without password would be.
    #[instrument(skip_all, fields(owner_id = %owner_id, encrypted = input.is_encrypted))]
    pub fn create_note(&self, owner_id: &str, input: NoteCreate) -> Result<Note> {
        check_owner(owner_id)?;

        let plan = plan_create(&input)?;
        let sensitivity = score_content(self.scorer.as_ref(), &input.content);

        let now = current_timestamp();
        let record = NoteRecord {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            title: input.title,
            body: plan.body,
            created_at: now,
            updated_at: now,
            sensitivity,
        };

        self.store.apply(
            WriteBatch::new()
                .put_record(&record.id, record.to_fields())
                .index_upsert(&record.owner_id, &record.id, record.index_score()),
        )?;

        info!(note_id = %record.id, "note created");
        Ok(present(&record))
    }

    /// Fetch a note, decrypting it when a password is given.
    ///
    /// Returns `Ok(None)` for missing notes and notes of other owners. An
    /// encrypted note that cannot be opened comes back with sentinel content.
    #[instrument(skip_all, fields(note_id = %note_id, owner_id = %owner_id))]
    pub fn get_note(
        &self,
        note_id: &str,
        owner_id: &str,
        password: Option<&SecretString>,
    ) -> Result<Option<Note>> {
        let Some(record) = self.load(note_id, owner_id)? else {
            return Ok(None);
        };

        let content = resolve_content(&record, password).render();
        Ok(Some(Note::from_record(&record, content)))
    }

    /// One page of an owner's notes, most recently updated first.
    ///
    /// `limit` is clamped to `1..=100`. Encrypted notes are not decrypted.
    #[instrument(skip_all, fields(owner_id = %owner_id, skip = skip, limit = limit))]
    pub fn list_notes(&self, owner_id: &str, skip: usize, limit: usize) -> Result<Vec<Note>> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);

        let ids = self.store.owner_range(owner_id, skip, limit)?;
        let mut notes = Vec::with_capacity(ids.len());
        for note_id in ids {
            match self.load(&note_id, owner_id)? {
                Some(record) => notes.push(present(&record)),
                None => warn!(note_id = %note_id, "index entry without a note"),
            }
        }

        debug!(count = notes.len(), "notes listed");
        Ok(notes)
    }

    /// Number of notes an owner has.
    pub fn count_notes(&self, owner_id: &str) -> Result<usize> {
        self.store.owner_count(owner_id)
    }

    /// Apply an update to a note.
    ///
    /// # Errors
    ///
    /// - `NoteError::NotFound` if the note does not exist for this owner
    /// - `NoteError::InvalidInput` if the transition is not allowed as given
    #[instrument(skip_all, fields(note_id = %note_id, owner_id = %owner_id))]
    pub fn update_note(&self, note_id: &str, owner_id: &str, update: NoteUpdate) -> Result<Note> {
        let current = self.require(note_id, owner_id)?;
        let plan = plan_update(&current, &update)?;

        let sensitivity = match plan.rescore.as_deref() {
            Some(plaintext) => score_content(self.scorer.as_ref(), plaintext),
            None => current.sensitivity.clone(),
        };

        let record = NoteRecord {
            id: current.id.clone(),
            owner_id: current.owner_id.clone(),
            title: plan.title,
            body: plan.body,
            created_at: current.created_at,
            updated_at: next_timestamp(&current.updated_at),
            sensitivity,
        };

        self.store.apply(
            WriteBatch::new()
                .put_record(&record.id, record.to_fields())
                .index_upsert(&record.owner_id, &record.id, record.index_score()),
        )?;

        info!(transition = %plan.transition, "note updated");
        Ok(present(&record))
    }

    /// Delete a note and its index entry.
    ///
    /// Returns `false` if there was nothing to delete.
    #[instrument(skip_all, fields(note_id = %note_id, owner_id = %owner_id))]
    pub fn delete_note(&self, note_id: &str, owner_id: &str) -> Result<bool> {
        let Some(record) = self.load(note_id, owner_id)? else {
            return Ok(false);
        };

        self.store.apply(
            WriteBatch::new()
                .delete_record(&record.id)
                .index_remove(&record.owner_id, &record.id),
        )?;

        info!("note deleted");
        Ok(true)
    }

    /// Clone a note under a new encryption disposition.
    ///
    /// The original is read with `decrypt_password`; it must resolve to
    /// plaintext. The copy is created first and the original deleted only
    /// afterwards, when `delete_original` is set.
    ///
    /// # Errors
    ///
    /// - `NoteError::NotFound` if the original does not exist for this owner
    /// - `NoteError::DecryptionRequired` if the original stays encrypted
    #[instrument(skip_all, fields(note_id = %note_id, owner_id = %owner_id, delete_original = delete_original))]
    pub fn recreate_note(
        &self,
        note_id: &str,
        owner_id: &str,
        request: NoteRecreate,
        decrypt_password: Option<&SecretString>,
        delete_original: bool,
    ) -> Result<Note> {
        let original = self.require(note_id, owner_id)?;

        let content = match resolve_content(&original, decrypt_password) {
            ContentView::Resolved(text) => text,
            view => {
                debug!(view = ?view, "original not resolved");
                return Err(NoteError::DecryptionRequired);
            }
        };

        let input = NoteCreate {
            title: request.title.unwrap_or(original.title),
            content: request.content.unwrap_or(content),
            is_encrypted: request.is_encrypted,
            encryption_password: request.encryption_password,
        };
        let created = self.create_note(owner_id, input)?;

        if delete_original {
            self.delete_note(note_id, owner_id)?;
        }

        info!(new_note_id = %created.id, "note recreated");
        Ok(created)
    }

    fn load(&self, note_id: &str, owner_id: &str) -> Result<Option<NoteRecord>> {
        let Some(fields) = self.store.fetch_record(note_id)? else {
            return Ok(None);
        };

        let record = NoteRecord::from_fields(note_id, &fields);
        if record.owner_id != owner_id {
            debug!("note belongs to another owner");
            return Ok(None);
        }
        Ok(Some(record))
    }

    fn require(&self, note_id: &str, owner_id: &str) -> Result<NoteRecord> {
        self.load(note_id, owner_id)?
            .ok_or_else(|| NoteError::NotFound(format!("Note {}", note_id)))
    }
}

/// A note as a read without password presents it.
fn present(record: &NoteRecord) -> Note {
    Note::from_record(record, resolve_content(record, None).render())
}

fn check_owner(owner_id: &str) -> Result<()> {
    if owner_id.trim().is_empty() {
        return Err(NoteError::InvalidInput("Owner id cannot be empty".to_string()));
    }
    Ok(())
}
