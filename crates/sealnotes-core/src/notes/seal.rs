//! Password-level sealing of note content.
//!
//! Each call derives its key from scratch and drops it on return.

use crate::crypto::{decrypt, derive_key, encrypt, Salt};
use crate::error::Result;
use crate::storage::SealedContent;

/// Encrypt `plaintext` under `password` with a freshly generated salt.
pub(crate) fn seal(plaintext: &str, password: &str) -> Result<SealedContent> {
    let (key, salt) = derive_key(password, None)?;
    let token = encrypt(plaintext, &key)?;
    Ok(SealedContent {
        token,
        salt: Some(salt.encode()),
    })
}

/// Decrypt a token with `password` and the note's stored salt.
pub(crate) fn unseal(token: &str, salt: &str, password: &str) -> Result<String> {
    let salt = Salt::decode(salt)?;
    let (key, _) = derive_key(password, Some(salt))?;
    decrypt(token, &key)
}
