//! File metadata as exchanged over the wire.

use base64::{engine::general_purpose::STANDARD, Engine};
use relay_crypto::{verify_challenge, ChunkKey, Salt, HASH_SIZE, OVERHEAD, SALT_SIZE};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;
use crate::ids::FileId;

/// Transport chunk size: every ciphertext chunk except the last is exactly
/// this many bytes.
pub const CHUNK_SIZE: usize = 32 * 1024;

/// Plaintext bytes per chunk, so that a sealed chunk fills [`CHUNK_SIZE`].
pub const RAW_CHUNK_SIZE: usize = CHUNK_SIZE - OVERHEAD;

/// Size of a challenge: a sealed SHA-256 hash.
pub const CHALLENGE_SIZE: usize = HASH_SIZE + OVERHEAD;

/// Public description of a relayed file.
///
/// Clients send everything except `id`, `uploaded` and `downloads`, which
/// the server fills in. Byte fields travel as standard base64 strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileMetadata {
    /// Server-assigned identifier. An empty string reads as absent.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub id: Option<FileId>,
    /// Original file name.
    pub name: String,
    /// Plaintext size in bytes.
    pub size: u64,
    /// Key derivation salt.
    #[serde(with = "base64_bytes")]
    pub salt: Vec<u8>,
    /// SHA-256 of the plaintext.
    #[serde(with = "base64_bytes")]
    pub hash: Vec<u8>,
    /// `hash` sealed under the file key.
    #[serde(with = "base64_bytes")]
    pub challenge: Vec<u8>,
    /// Creation time, Unix seconds (UTC).
    #[serde(skip_serializing_if = "is_zero")]
    pub uploaded: u64,
    /// Completed downloads.
    #[serde(skip_serializing_if = "is_zero")]
    pub downloads: u64,
}

impl FileMetadata {
    /// Validate a client-submitted creation request.
    ///
    /// `max_size` of 0 disables the size limit.
    pub fn validate_new(&self, max_size: u64) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.size == 0 {
            return Err(ValidationError::EmptyFile);
        }
        if max_size > 0 && self.size > max_size {
            return Err(ValidationError::TooLarge);
        }
        if self.hash.len() != HASH_SIZE {
            return Err(ValidationError::InvalidHash);
        }
        if self.salt.len() != SALT_SIZE {
            return Err(ValidationError::InvalidSalt);
        }
        if self.challenge.len() != CHALLENGE_SIZE {
            return Err(ValidationError::InvalidChallenge);
        }
        if self.uploaded != 0 {
            return Err(ValidationError::UnexpectedField("uploaded"));
        }
        if self.id.is_some() {
            return Err(ValidationError::UnexpectedField("id"));
        }
        if self.downloads != 0 {
            return Err(ValidationError::UnexpectedField("downloads"));
        }
        Ok(())
    }

    /// Check whether `key` opens the challenge to this file's hash.
    pub fn check_challenge(&self, key: &ChunkKey) -> bool {
        verify_challenge(key, &self.challenge, &self.hash)
    }

    /// The salt as a fixed-size array, if it has the right length.
    pub fn kdf_salt(&self) -> Option<Salt> {
        self.salt.as_slice().try_into().ok()
    }
}

/// Body of a successful creation response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFileResponse {
    /// Identifier to upload the body to.
    pub id: FileId,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<FileId>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.is_empty() => raw.parse().map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

mod base64_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
