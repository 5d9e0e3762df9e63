//! Error types for relay-crypto.

use thiserror::Error;

/// Errors that can occur during chunk encryption and key derivation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Ciphertext is shorter than nonce + tag and cannot be a sealed chunk.
    #[error("ciphertext too short")]
    CiphertextTooShort,

    /// Sealing a chunk failed (plaintext beyond the AEAD length limit).
    #[error("encryption failed")]
    EncryptFailed,

    /// Decryption failed (authentication error).
    /// No details provided to prevent timing attacks.
    #[error("decryption failed")]
    DecryptFailed,

    /// The operating system RNG could not produce random bytes.
    #[error("random number generation failed: {0}")]
    Random(String),

    /// Key derivation parameters were rejected by Argon2.
    #[error("invalid key derivation parameters: {0}")]
    InvalidKdfParams(String),

    /// Argon2 failed while hashing the password.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
}

impl From<getrandom::Error> for CryptoError {
    fn from(e: getrandom::Error) -> Self {
        CryptoError::Random(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_errors_do_not_leak_details() {
        assert_eq!(CryptoError::DecryptFailed.to_string(), "decryption failed");
        assert_eq!(
            CryptoError::CiphertextTooShort.to_string(),
            "ciphertext too short"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<CryptoError>();
    }
}
