//! Error types for relay-client.

use relay_crypto::CryptoError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to a relay.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Local file or network I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay answered with an unexpected status.
    #[error("relay returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (plain-text reason).
        body: String,
    },

    /// Response JSON could not be decoded.
    #[error("invalid JSON from relay: {0}")]
    Json(#[from] serde_json::Error),

    /// Key derivation or encryption failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Directories cannot be uploaded.
    #[error("{0} is a directory")]
    IsDirectory(PathBuf),

    /// The password does not open the file's challenge.
    #[error("incorrect password")]
    IncorrectPassword,

    /// Downloaded content does not match the published hash.
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch {
        /// Hash from the file metadata (hex).
        expected: String,
        /// What was actually received.
        actual: String,
    },

    /// Metadata from the relay is unusable.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),
}
