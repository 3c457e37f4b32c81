//! Storage abstraction for Sealnotes.
//!
//! This module defines the `NoteStore` trait and the record types that
//! cross it.
//!
//! ## Architecture
//!
//! The store is deliberately dumb: a flat text field map per note and, per
//! owner, an index of note ids scored by last update. It never sees a
//! password or a key; content arrives already sealed.
//!
//! - SQLite: the on-disk backend used by the CLI
//! - Memory: tests and embedding
//!
//! Every logical write is a [`WriteBatch`] applied all-or-nothing.

pub mod memory;
pub mod record;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export public types
pub use memory::MemoryNoteStore;
pub use sqlite::SqliteNoteStore;
pub use traits::{NoteStore, WriteBatch, WriteOp};
pub use types::{FieldMap, NoteBody, NoteRecord, SealedContent};
