//! Authenticated encryption of note content.
//!
//! Tokens are self-describing text:
//!
//! ```text
//! base64url( version (1) || nonce (12) || AES-256-GCM ciphertext || tag (16) )
//! ```
//!
//! The version byte is bound as associated data, so a token cannot be
//! replayed under a different format revision.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::encoding::decode_lenient;
use crate::crypto::key::DerivedKey;
use crate::error::{NoteError, Result};

/// Current token format revision.
const TOKEN_VERSION: u8 = 0x01;

fn sealing_key(key: &DerivedKey) -> Result<LessSafeKey> {
    let unbound = UnboundKey::new(&AES_256_GCM, key.as_bytes())
        .map_err(|_| NoteError::Crypto("Failed to initialise cipher key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt text under a derived key.
///
/// A fresh random nonce is drawn for every call, so encrypting the same
/// plaintext twice yields different tokens.
///
/// # Examples
///
/// ```
/// use sealnotes_core::crypto::{decrypt, derive_key, encrypt};
///
/// let (key, _salt) = derive_key("my-password", None).unwrap();
/// let token = encrypt("secret note", &key).unwrap();
/// assert_eq!(decrypt(&token, &key).unwrap(), "secret note");
/// ```
pub fn encrypt(plaintext: &str, key: &DerivedKey) -> Result<String> {
    let sealing = sealing_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| NoteError::Crypto("Failed to generate nonce".to_string()))?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let mut in_out = plaintext.as_bytes().to_vec();
    sealing
        .seal_in_place_append_tag(nonce, Aad::from([TOKEN_VERSION]), &mut in_out)
        .map_err(|_| NoteError::Crypto("Encryption failed".to_string()))?;

    let mut token = Vec::with_capacity(1 + NONCE_LEN + in_out.len());
    token.push(TOKEN_VERSION);
    token.extend_from_slice(&nonce_bytes);
    token.extend_from_slice(&in_out);

    debug!(token_len = token.len(), "content sealed");
    Ok(URL_SAFE.encode(token))
}

/// Decrypt a token produced by [`encrypt`].
///
/// # Errors
///
/// - `NoteError::Format` if the token is not decodable, truncated, of an
///   unknown version, or does not decrypt to UTF-8 text
/// - `NoteError::AuthenticationFailure` if the key is wrong or the token was
///   tampered with
///
/// No plaintext, partial or otherwise, is returned on failure.
pub fn decrypt(token: &str, key: &DerivedKey) -> Result<String> {
    let raw = decode_lenient(token)?;
    let tag_len = AES_256_GCM.tag_len();

    if raw.len() < 1 + NONCE_LEN + tag_len {
        return Err(NoteError::Format(format!(
            "Token is truncated ({} bytes)",
            raw.len()
        )));
    }

    let (version, rest) = raw.split_at(1);
    if version[0] != TOKEN_VERSION {
        return Err(NoteError::Format(format!(
            "Unsupported token version {:#04x}",
            version[0]
        )));
    }

    let (nonce_bytes, sealed) = rest.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
        .map_err(|_| NoteError::Format("Invalid token nonce".to_string()))?;

    let sealing = sealing_key(key)?;
    let mut in_out = Zeroizing::new(sealed.to_vec());
    let plaintext_len = sealing
        .open_in_place(nonce, Aad::from([TOKEN_VERSION]), in_out.as_mut_slice())
        .map_err(|_| NoteError::AuthenticationFailure)?
        .len();

    let plaintext = std::str::from_utf8(&in_out[..plaintext_len])
        .map_err(|_| NoteError::Format("Decrypted content is not valid UTF-8".to_string()))?;

    Ok(plaintext.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key::{derive_key, Salt};

    fn key_for(password: &str) -> DerivedKey {
        let salt = Salt::from_bytes(b"cipher-test-salt".to_vec()).unwrap();
        derive_key(password, Some(salt)).unwrap().0
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let key = key_for("test-password");
        let plaintext = "Hello, World! This is secret data.";

        let token = encrypt(plaintext, &key).unwrap();
        assert_eq!(decrypt(&token, &key).unwrap(), plaintext);
    }

    #[test]
    fn test_empty_and_non_ascii_round_trip() {
        let key = key_for("test-password");

        for plaintext in ["", "naïve café ☕ 日本語のメモ", "line one\nline two\ttabbed"] {
            let token = encrypt(plaintext, &key).unwrap();
            assert_eq!(decrypt(&token, &key).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_token_is_text_and_hides_plaintext() {
        let key = key_for("test-password");
        let token = encrypt("secret data", &key).unwrap();

        assert!(!token.contains("secret"));
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '='));
    }

    #[test]
    fn test_same_plaintext_different_tokens() {
        let key = key_for("test-password");

        let token1 = encrypt("same plaintext", &key).unwrap();
        let token2 = encrypt("same plaintext", &key).unwrap();

        assert_ne!(token1, token2);
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let token = encrypt("secret data", &key_for("correct-password")).unwrap();

        let result = decrypt(&token, &key_for("wrong-password"));
        assert!(matches!(result, Err(NoteError::AuthenticationFailure)));
    }

    #[test]
    fn test_tampered_token_fails_authentication() {
        let key = key_for("test-password");
        let token = encrypt("secret data", &key).unwrap();

        let mut raw = decode_lenient(&token).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = URL_SAFE.encode(raw);

        let result = decrypt(&tampered, &key);
        assert!(matches!(result, Err(NoteError::AuthenticationFailure)));
    }

    #[test]
    fn test_truncated_token_fails_with_format_error() {
        let key = key_for("test-password");
        let token = encrypt("secret data", &key).unwrap();

        let raw = decode_lenient(&token).unwrap();
        let truncated = URL_SAFE.encode(&raw[..20]);

        let result = decrypt(&truncated, &key);
        assert!(matches!(result, Err(NoteError::Format(_))));
    }

    #[test]
    fn test_garbage_token_fails_with_format_error() {
        let key = key_for("test-password");

        assert!(matches!(decrypt("%%%not a token%%%", &key), Err(NoteError::Format(_))));
        assert!(matches!(decrypt("", &key), Err(NoteError::Format(_))));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let key = key_for("test-password");
        let token = encrypt("secret data", &key).unwrap();

        let mut raw = decode_lenient(&token).unwrap();
        raw[0] = 0x7f;
        let result = decrypt(&URL_SAFE.encode(raw), &key);

        assert!(matches!(result, Err(NoteError::Format(_))));
    }

    #[test]
    fn test_unpadded_token_decrypts() {
        let key = key_for("test-password");
        // 5 bytes of plaintext -> 34-byte token -> base64 needs padding
        let token = encrypt("hello", &key).unwrap();
        assert!(token.ends_with('='));

        let unpadded = token.trim_end_matches('=');
        assert_eq!(decrypt(unpadded, &key).unwrap(), "hello");
    }
}
