//! Lenient base64 handling for salts and tokens.
//!
//! Stored values pass through several hands (databases, JSON bodies, shell
//! arguments) and occasionally lose their trailing padding or come back in
//! the standard alphabet. Decoding normalises those variants before giving
//! up.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{NoteError, Result};

/// Decode base64 text in either alphabet, with or without padding.
///
/// Whitespace is ignored. Returns `NoteError::Format` when the input is not
/// base64 even after normalisation.
pub fn decode_lenient(input: &str) -> Result<Vec<u8>> {
    let normalized: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let unpadded = normalized.trim_end_matches('=');

    URL_SAFE_NO_PAD
        .decode(unpadded)
        .map_err(|e| NoteError::Format(format!("Invalid base64 encoding: {}", e)))
}
