//! Key derivation using PBKDF2-HMAC-SHA-256.
//!
//! This module derives note encryption keys from passwords. Every encrypted
//! note has its own salt, so the same password yields unrelated keys for
//! different notes.

use std::num::NonZeroU32;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ring::digest;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::encoding::decode_lenient;
use crate::error::{NoteError, Result};

/// PBKDF2 work factor.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Length of a freshly generated salt in bytes.
pub const SALT_LENGTH: usize = 16;

/// Length of derived key in bytes (32 bytes = 256 bits for AES-256-GCM).
pub const KEY_LENGTH: usize = 32;

const ITERATIONS: NonZeroU32 = match NonZeroU32::new(PBKDF2_ITERATIONS) {
    Some(value) => value,
    None => panic!("PBKDF2 iterations must be non-zero"),
};

/// Random per-note salt mixed into key derivation.
///
/// Salts are not secret; they are persisted next to the note's token as
/// standard base64 text.
#[derive(Clone, PartialEq, Eq)]
pub struct Salt(Vec<u8>);

impl Salt {
    /// Generate a fresh salt from the OS CSPRNG.
    pub fn generate() -> Result<Self> {
        let mut bytes = vec![0u8; SALT_LENGTH];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|_| NoteError::Crypto("Failed to generate salt".to_string()))?;
        Ok(Self(bytes))
    }

    /// Wrap existing salt bytes.
    ///
    /// Returns `NoteError::InvalidInput` if fewer than 16 bytes are given.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.len() < SALT_LENGTH {
            return Err(NoteError::InvalidInput(format!(
                "Salt must be at least {} bytes (got {})",
                SALT_LENGTH,
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// Parse a stored salt, tolerating missing padding.
    pub fn decode(encoded: &str) -> Result<Self> {
        Self::from_bytes(decode_lenient(encoded)?)
    }

    /// Text form for persistence.
    pub fn encode(&self) -> String {
        STANDARD.encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Salt").field(&self.encode()).finish()
    }
}

/// A cryptographic key derived from a password.
///
/// Key material is zeroized from memory when dropped. Keys are never cached:
/// every encrypt or decrypt derives its own and drops it straight after.
#[derive(ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an encryption key from a password.
///
/// When `salt` is `None` a fresh salt is generated; the salt actually used is
/// returned alongside the key so callers can persist it.
///
/// The password is condensed with SHA-256 before entering PBKDF2, so the
/// HMAC key is always 32 bytes and the 100,000 iterations cost the same for
/// every password regardless of its content or length.
///
/// # Security
///
/// - Same password + salt always produces same key (deterministic)
/// - Different salt produces an unrelated key
///
/// # Examples
///
/// ```
/// use sealnotes_core::crypto::{derive_key, Salt};
///
/// let (key, salt) = derive_key("my-password", None).unwrap();
/// let (again, _) = derive_key("my-password", Some(salt)).unwrap();
/// assert_eq!(key.as_bytes(), again.as_bytes());
/// ```
pub fn derive_key(password: &str, salt: Option<Salt>) -> Result<(DerivedKey, Salt)> {
    if password.is_empty() {
        return Err(NoteError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    let salt = match salt {
        Some(salt) => salt,
        None => Salt::generate()?,
    };

    let condensed = digest::digest(&digest::SHA256, password.as_bytes());

    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        ITERATIONS,
        salt.as_bytes(),
        condensed.as_ref(),
        &mut key_bytes,
    );

    let key = DerivedKey::from_bytes(key_bytes);
    key_bytes.zeroize();
    Ok((key, salt))
}
