//! Base64 helpers for WireGuard key material
//!
//! WireGuard writes keys as standard base64 (with `=` padding, no line wrapping),
//! always 44 characters for a 32-byte key.

use base64::Engine;
use thiserror::Error;

/// Length of a Curve25519 key in bytes
pub const KEY_LEN: usize = 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeyDecodeError {
    #[error("Invalid base64: {0}")]
    InvalidBase64(String),

    #[error("Key must be {KEY_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

/// Encode a 32-byte key as standard base64
pub fn encode_key(key: &[u8; KEY_LEN]) -> String {
    base64::engine::general_purpose::STANDARD.encode(key)
}

/// Decode a standard base64 key, requiring exactly 32 bytes
pub fn decode_key(encoded: &str) -> Result<[u8; KEY_LEN], KeyDecodeError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| KeyDecodeError::InvalidBase64(e.to_string()))?;

    bytes
        .as_slice()
        .try_into()
        .map_err(|_| KeyDecodeError::InvalidLength(bytes.len()))
}
