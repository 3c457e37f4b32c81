//! # Sealnotes Core
//!
//! Core library for Sealnotes - a note store with optional per-note
//! encryption at rest under password-derived keys.
//!
//! This crate provides the domain logic, storage abstractions and data models
//! independent of any front end.
//!
//! ## Architecture
//!
//! - **crypto**: PBKDF2 key derivation and the authenticated token cipher
//! - **storage**: Note record store trait, SQLite and in-memory backends
//! - **notes**: Encryption state machine, read-path decryptor, note service
//! - **sensitivity**: Content sensitivity scorer seam
//!
//! ## Security
//!
//! - Every encrypted note carries its own random salt
//! - Keys are derived fresh for every operation and zeroized on drop
//! - Locked or failed decryptions surface as sentinel content, never as
//!   partial plaintext

pub mod crypto;
pub mod error;
pub mod notes;
pub mod sensitivity;
pub mod storage;

pub use error::{NoteError, Result};
pub use notes::{Note, NoteCreate, NoteRecreate, NoteService, NoteUpdate};
pub use storage::NoteStore;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
