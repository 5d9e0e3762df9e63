//! Password-based key derivation.
//!
//! Keys are derived with Argon2id from the user's password and a 16-byte
//! salt. The salt is generated by the uploader and published with the file
//! metadata so that a downloader holding the password can re-derive the same
//! key. Work-factor parameters are fixed per deployment: the uploader and the
//! downloader must agree on them, since they are not shipped in metadata.

use argon2::{Algorithm, Argon2, Params, Version};

use crate::cipher::{ChunkKey, KEY_SIZE};
use crate::error::CryptoError;

/// Size of the key derivation salt in bytes.
pub const SALT_SIZE: usize = 16;

/// A key derivation salt.
pub type Salt = [u8; SALT_SIZE];

/// Argon2id work-factor parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl KdfParams {
    /// Production parameters: 64 MiB memory, 3 iterations, 4 lanes.
    pub const DEFAULT: KdfParams = KdfParams::new(64 * 1024, 3, 4);

    /// Create custom parameters.
    ///
    /// Parameters are validated when first used; an invalid combination is a
    /// configuration error and is reported as `InvalidKdfParams`.
    pub const fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    /// Get memory cost in KiB.
    pub fn memory_kib(&self) -> u32 {
        self.memory_kib
    }

    /// Get iteration count.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Get degree of parallelism.
    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    fn to_argon2_params(self) -> Result<Params, CryptoError> {
        Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_SIZE),
        )
        .map_err(|e| CryptoError::InvalidKdfParams(e.to_string()))
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Generate a fresh random salt.
pub fn generate_salt() -> Result<Salt, CryptoError> {
    let mut salt = [0u8; SALT_SIZE];
    getrandom::getrandom(&mut salt)?;
    Ok(salt)
}

/// Derive a chunk key from a password.
///
/// When `salt` is `None` a new random salt is generated. The salt actually
/// used is returned alongside the key. Same password + salt + params always
/// yields the same key.
pub fn derive_key(
    password: &[u8],
    salt: Option<&Salt>,
    params: KdfParams,
) -> Result<(ChunkKey, Salt), CryptoError> {
    let salt = match salt {
        Some(salt) => *salt,
        None => generate_salt()?,
    };

    let argon2 = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        params.to_argon2_params()?,
    );

    // Hash straight into the key so no copy of the output outlives it.
    // On error the partially written key is wiped when dropped.
    let mut key = ChunkKey::from_bytes([0u8; KEY_SIZE]);
    argon2
        .hash_password_into(password, &salt, key.as_mut_bytes())
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

    Ok((key, salt))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cheap parameters so tests stay fast
    const FAST: KdfParams = KdfParams::new(1024, 1, 1);

    #[test]
    fn default_params_are_memory_hard() {
        let params = KdfParams::default();
        assert_eq!(params.memory_kib(), 64 * 1024);
        assert_eq!(params.iterations(), 3);
        assert_eq!(params.parallelism(), 4);
    }

    #[test]
    fn derivation_is_deterministic() {
        let salt = [7u8; SALT_SIZE];
        let (key1, salt1) = derive_key(b"correct horse", Some(&salt), FAST).unwrap();
        let (key2, salt2) = derive_key(b"correct horse", Some(&salt), FAST).unwrap();

        assert_eq!(key1, key2);
        assert_eq!(salt1, salt);
        assert_eq!(salt2, salt);
    }

    #[test]
    fn different_passwords_differ() {
        let salt = [1u8; SALT_SIZE];
        let (key1, _) = derive_key(b"password-1", Some(&salt), FAST).unwrap();
        let (key2, _) = derive_key(b"password-2", Some(&salt), FAST).unwrap();

        assert_ne!(key1, key2);
    }

    #[test]
    fn different_salts_differ() {
        let (key1, _) = derive_key(b"same", Some(&[1u8; SALT_SIZE]), FAST).unwrap();
        let (key2, _) = derive_key(b"same", Some(&[2u8; SALT_SIZE]), FAST).unwrap();

        assert_ne!(key1, key2);
    }

    #[test]
    fn missing_salt_is_generated() {
        let (key1, salt1) = derive_key(b"pw", None, FAST).unwrap();
        let (key2, salt2) = derive_key(b"pw", None, FAST).unwrap();

        assert_ne!(salt1, salt2);
        assert_ne!(key1, key2);

        // The returned salt reproduces the key
        let (again, _) = derive_key(b"pw", Some(&salt1), FAST).unwrap();
        assert_eq!(again, key1);
    }

    #[test]
    fn params_affect_output() {
        let salt = [9u8; SALT_SIZE];
        let (key1, _) = derive_key(b"pw", Some(&salt), FAST).unwrap();
        let (key2, _) = derive_key(b"pw", Some(&salt), KdfParams::new(1024, 2, 1)).unwrap();

        assert_ne!(key1, key2);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let result = derive_key(b"pw", None, KdfParams::new(1024, 0, 1));
        assert!(matches!(result, Err(CryptoError::InvalidKdfParams(_))));
    }

    #[test]
    fn empty_password_still_derives() {
        let (key, _) = derive_key(b"", Some(&[3u8; SALT_SIZE]), FAST).unwrap();
        assert_ne!(key.as_bytes(), &[0u8; KEY_SIZE]);
    }
}
