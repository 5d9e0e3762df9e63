//! Per-chunk authenticated encryption.
//!
//! Every chunk is sealed independently with XChaCha20-Poly1305 under a fresh
//! random 192-bit nonce. The nonce travels in front of the sealed payload:
//!
//! ```text
//! +-----------+----------------------------------+
//! | nonce(24) | ciphertext(len) || poly1305 tag(16) |
//! +-----------+----------------------------------+
//! ```
//!
//! so a chunk can be decrypted on its own without any stream state.

use chacha20poly1305::{
    aead::{Aead, AeadInPlace, KeyInit},
    Key, XChaCha20Poly1305, XNonce,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// Size of the chunk encryption key in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Size of XChaCha20-Poly1305 nonce in bytes (192 bits).
pub const NONCE_SIZE: usize = 24;

/// Size of the Poly1305 authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Bytes added to every plaintext chunk by [`encrypt_chunk`].
pub const OVERHEAD: usize = NONCE_SIZE + TAG_SIZE;

/// A 256-bit symmetric key for chunk encryption.
///
/// Wiped from memory when dropped. Never serialized.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ChunkKey([u8; KEY_SIZE]);

impl ChunkKey {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8; KEY_SIZE] {
        &mut self.0
    }

    fn cipher(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new(Key::from_slice(&self.0))
    }
}

// Don't leak keys in debug output
impl std::fmt::Debug for ChunkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ChunkKey([REDACTED])")
    }
}

/// Encrypt one plaintext chunk.
///
/// Returns `nonce || sealed`, which is exactly `chunk.len() + OVERHEAD` bytes.
pub fn encrypt_chunk(key: &ChunkKey, chunk: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut nonce = [0u8; NONCE_SIZE];
    getrandom::getrandom(&mut nonce)?;

    let mut out = Vec::with_capacity(chunk.len() + OVERHEAD);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(chunk);

    // Seal the plaintext in place right after the nonce, then append the tag
    let tag = key
        .cipher()
        .encrypt_in_place_detached(XNonce::from_slice(&nonce), b"", &mut out[NONCE_SIZE..])
        .map_err(|_| CryptoError::EncryptFailed)?;
    out.extend_from_slice(&tag);

    Ok(out)
}

/// Decrypt one ciphertext chunk produced by [`encrypt_chunk`].
///
/// Fails with `CiphertextTooShort` when the input cannot hold a nonce and a
/// tag, and with `DecryptFailed` when authentication fails (wrong key or
/// tampered data).
pub fn decrypt_chunk(key: &ChunkKey, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if ciphertext.len() < OVERHEAD {
        return Err(CryptoError::CiphertextTooShort);
    }

    let (nonce, sealed) = ciphertext.split_at(NONCE_SIZE);
    key.cipher()
        .decrypt(XNonce::from_slice(nonce), sealed)
        .map_err(|_| CryptoError::DecryptFailed)
}
