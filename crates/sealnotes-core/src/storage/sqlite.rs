//! SQLite note store.
//!
//! Note records are kept as `(note_id, field, value)` rows so that a record
//! stays a flat field map, and owner indexes as scored `(owner_id, note_id)`
//! rows. Every batch runs inside one SQLite transaction.
//!
//! The store is a process-wide resource: open it once at start-up, share it
//! behind an `Arc`, and release it with [`SqliteNoteStore::close`].

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Transaction};
use tracing::{debug, info};

use crate::error::{NoteError, Result};
use crate::storage::traits::{NoteStore, WriteBatch, WriteOp};
use crate::storage::types::FieldMap;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS note_fields (
        note_id TEXT NOT NULL,
        field TEXT NOT NULL,
        value TEXT NOT NULL,

        PRIMARY KEY(note_id, field)
    );

    CREATE TABLE IF NOT EXISTS owner_index (
        owner_id TEXT NOT NULL,
        note_id TEXT NOT NULL,
        score REAL NOT NULL,

        PRIMARY KEY(owner_id, note_id)
    );

    CREATE INDEX IF NOT EXISTS owner_index_by_score
        ON owner_index(owner_id, score DESC, note_id DESC);
"#;

/// SQLite-backed note store.
pub struct SqliteNoteStore {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SqliteNoteStore {
    /// Open (or create) a store file.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::Storage` if the parent directory cannot be created,
    /// or a SQLite error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    NoteError::Storage(format!(
                        "Failed to create store directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::initialize(conn, Some(path.to_path_buf()))
    }

    /// Open a private, non-persistent store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn, None)
    }

    fn initialize(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        info!(path = ?path, "note store opened");
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the store, releasing the connection.
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| NoteError::Storage("SQLite connection poisoned".to_string()))?;
        conn.close().map_err(|(_, err)| NoteError::from(err))?;
        info!(path = ?self.path, "note store closed");
        Ok(())
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| NoteError::Storage("SQLite connection poisoned".to_string()))
    }

    fn apply_op(tx: &Transaction<'_>, op: &WriteOp) -> Result<()> {
        match op {
            WriteOp::PutRecord { note_id, fields } => {
                tx.execute("DELETE FROM note_fields WHERE note_id = ?", [note_id])?;
                let mut insert = tx.prepare_cached(
                    "INSERT INTO note_fields (note_id, field, value) VALUES (?, ?, ?)",
                )?;
                for (field, value) in fields {
                    insert.execute((note_id, field, value))?;
                }
            }
            WriteOp::DeleteRecord { note_id } => {
                tx.execute("DELETE FROM note_fields WHERE note_id = ?", [note_id])?;
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
                tx.execute(
                    r#"
                    INSERT INTO owner_index (owner_id, note_id, score)
                    VALUES (?, ?, ?)
                    ON CONFLICT(owner_id, note_id) DO UPDATE SET score = excluded.score
                    "#,
                    (owner_id, note_id, score),
                )?;
            }
            WriteOp::IndexRemove { owner_id, note_id } => {
                tx.execute(
                    "DELETE FROM owner_index WHERE owner_id = ? AND note_id = ?",
                    (owner_id, note_id),
                )?;
            }
        }
        Ok(())
    }
}

impl NoteStore for SqliteNoteStore {
    fn fetch_record(&self, note_id: &str) -> Result<Option<FieldMap>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare_cached("SELECT field, value FROM note_fields WHERE note_id = ?")?;
        let rows = stmt.query_map([note_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut fields = FieldMap::new();
        for row in rows {
            let (field, value) = row?;
            fields.insert(field, value);
        }

        if fields.is_empty() {
            Ok(None)
        } else {
            Ok(Some(fields))
        }
    }

    fn owner_range(&self, owner_id: &str, skip: usize, limit: usize) -> Result<Vec<String>> {
        let conn = self.lock_conn()?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let skip = i64::try_from(skip).unwrap_or(i64::MAX);

        let mut stmt = conn.prepare_cached(
            r#"
            SELECT note_id
            FROM owner_index
            WHERE owner_id = ?
            ORDER BY score DESC, note_id DESC
            LIMIT ? OFFSET ?
            "#,
        )?;
        let rows = stmt.query_map((owner_id, limit, skip), |row| row.get::<_, String>(0))?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }

    fn owner_count(&self, owner_id: &str) -> Result<usize> {
        let conn = self.lock_conn()?;

        let count: Option<i64> = conn
            .query_row(
                "SELECT COUNT(*) FROM owner_index WHERE owner_id = ?",
                [owner_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count.unwrap_or(0).max(0) as usize)
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        for op in batch.ops() {
            Self::apply_op(&tx, op)?;
        }

        tx.commit()?;
        debug!(ops = batch.ops().len(), "batch committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_put_and_fetch_record() {
        let store = SqliteNoteStore::open_in_memory().unwrap();
        let record = fields(&[("title", "hello"), ("content", "world")]);

        store
            .apply(WriteBatch::new().put_record("n1", record.clone()))
            .unwrap();

        assert_eq!(store.fetch_record("n1").unwrap(), Some(record));
        assert_eq!(store.fetch_record("missing").unwrap(), None);
    }

    #[test]
    fn test_put_record_replaces_all_fields() {
        let store = SqliteNoteStore::open_in_memory().unwrap();
        store
            .apply(WriteBatch::new().put_record("n1", fields(&[("salt", "abc"), ("content", "x")])))
            .unwrap();
        store
            .apply(WriteBatch::new().put_record("n1", fields(&[("content", "y")])))
            .unwrap();

        assert_eq!(
            store.fetch_record("n1").unwrap(),
            Some(fields(&[("content", "y")]))
        );
    }

    #[test]
    fn test_owner_range_orders_by_score_descending() {
        let store = SqliteNoteStore::open_in_memory().unwrap();
        store
            .apply(
                WriteBatch::new()
                    .index_upsert("o1", "a", 1.0)
                    .index_upsert("o1", "b", 3.0)
                    .index_upsert("o1", "c", 2.0)
                    .index_upsert("o2", "z", 9.0),
            )
            .unwrap();

        assert_eq!(store.owner_range("o1", 0, 10).unwrap(), vec!["b", "c", "a"]);
        assert_eq!(store.owner_range("o1", 1, 1).unwrap(), vec!["c"]);
        assert_eq!(store.owner_count("o1").unwrap(), 3);
        assert_eq!(store.owner_count("o3").unwrap(), 0);

        store
            .apply(WriteBatch::new().index_upsert("o1", "a", 5.0).index_remove("o1", "b"))
            .unwrap();
        assert_eq!(store.owner_range("o1", 0, 10).unwrap(), vec!["a", "c"]);
    }

    #[test]
    fn test_failed_batch_rolls_back() {
        let store = SqliteNoteStore::open_in_memory().unwrap();
        let original = fields(&[("content", "original")]);
        store
            .apply(
                WriteBatch::new()
                    .put_record("n1", original.clone())
                    .index_upsert("o1", "n1", 1.0),
            )
            .unwrap();

        let result = store.apply(
            WriteBatch::new()
                .put_record("n1", fields(&[("content", "changed")]))
                .index_upsert("o1", "n1", f64::NAN),
        );

        assert!(result.is_err());
        assert_eq!(store.fetch_record("n1").unwrap(), Some(original));
        assert_eq!(store.owner_range("o1", 0, 10).unwrap(), vec!["n1"]);
    }

    #[test]
    fn test_store_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("notes.db");

        let store = SqliteNoteStore::open(&path).unwrap();
        store
            .apply(
                WriteBatch::new()
                    .put_record("n1", fields(&[("title", "kept")]))
                    .index_upsert("o1", "n1", 1.0),
            )
            .unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
        store.close().unwrap();

        let reopened = SqliteNoteStore::open(&path).unwrap();
        assert_eq!(
            reopened.fetch_record("n1").unwrap(),
            Some(fields(&[("title", "kept")]))
        );
        assert_eq!(reopened.owner_range("o1", 0, 10).unwrap(), vec!["n1"]);
        reopened.close().unwrap();
    }
}
