//! Password challenges.
//!
//! A challenge is the plaintext hash of a file sealed as a single chunk under
//! the file key. A downloader decrypts it with the key derived from the
//! password they hold; success means the password is right, before any of
//! the (possibly large) file body is fetched.

use crate::cipher::{decrypt_chunk, encrypt_chunk, ChunkKey};
use crate::error::CryptoError;

/// Seal `plaintext_hash` under `key`.
pub fn create_challenge(key: &ChunkKey, plaintext_hash: &[u8]) -> Result<Vec<u8>, CryptoError> {
    encrypt_chunk(key, plaintext_hash)
}

/// Check that `challenge` opens under `key` to exactly `expected_hash`.
///
/// Any decryption error is reported as `false`; callers cannot tell a
/// malformed challenge from a wrong key.
pub fn verify_challenge(key: &ChunkKey, challenge: &[u8], expected_hash: &[u8]) -> bool {
    match decrypt_chunk(key, challenge) {
        Ok(hash) => hash == expected_hash,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::OVERHEAD;
    use crate::kdf::{derive_key, KdfParams, SALT_SIZE};

    const FAST: KdfParams = KdfParams::new(1024, 1, 1);
    const HASH: [u8; 32] = [0x5A; 32];

    #[test]
    fn challenge_has_fixed_size() {
        let key = ChunkKey::from_bytes([1; 32]);
        let challenge = create_challenge(&key, &HASH).unwrap();
        assert_eq!(challenge.len(), HASH.len() + OVERHEAD);
    }

    #[test]
    fn same_password_verifies() {
        let (key, salt) = derive_key(b"hunter2", None, FAST).unwrap();
        let challenge = create_challenge(&key, &HASH).unwrap();

        let (downloader_key, _) = derive_key(b"hunter2", Some(&salt), FAST).unwrap();
        assert!(verify_challenge(&downloader_key, &challenge, &HASH));
    }

    #[test]
    fn wrong_password_fails() {
        let salt = [4u8; SALT_SIZE];
        let (key, _) = derive_key(b"hunter2", Some(&salt), FAST).unwrap();
        let challenge = create_challenge(&key, &HASH).unwrap();

        let (wrong, _) = derive_key(b"hunter3", Some(&salt), FAST).unwrap();
        assert!(!verify_challenge(&wrong, &challenge, &HASH));
    }

    #[test]
    fn wrong_expected_hash_fails() {
        let key = ChunkKey::from_bytes([2; 32]);
        let challenge = create_challenge(&key, &HASH).unwrap();

        assert!(!verify_challenge(&key, &challenge, &[0u8; 32]));
    }

    #[test]
    fn malformed_challenge_is_just_false() {
        let key = ChunkKey::from_bytes([3; 32]);
        assert!(!verify_challenge(&key, &[], &HASH));
        assert!(!verify_challenge(&key, &[0u8; 10], &HASH));
        assert!(!verify_challenge(&key, &[0u8; 72], &HASH));
    }
}
