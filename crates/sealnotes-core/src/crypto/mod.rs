//! Cryptographic operations for Sealnotes.
//!
//! This module provides key derivation and content encryption using
//! `ring`'s audited primitives:
//! - **PBKDF2-HMAC-SHA-256**: password-based key derivation
//! - **AES-256-GCM**: authenticated encryption of note content
//!
//! ## Security Model
//!
//! - Every encrypted note has its own random salt, stored next to the token
//! - Keys are derived on demand and zeroized on drop; they are never cached
//! - Tokens are self-describing and integrity protected
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the note store
//! - Tampering with stored tokens
//!
//! We do NOT defend against:
//! - Lost passwords (there is no recovery)
//! - Compromised host / memory inspection while a note is being read

pub mod cipher;
pub mod encoding;
pub mod key;

pub use cipher::{decrypt, encrypt};
pub use key::{derive_key, DerivedKey, Salt};
