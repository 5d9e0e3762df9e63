//! Metadata validation errors.

use thiserror::Error;

/// Reasons a file creation request is rejected.
///
/// The `Display` text is sent to the client verbatim as the response body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// File name is empty.
    #[error("Name cannot be empty")]
    EmptyName,

    /// Declared size is zero.
    #[error("File must be >0 bytes")]
    EmptyFile,

    /// Declared size is above the relay's configured limit.
    #[error("File exceeds maximum size")]
    TooLarge,

    /// Hash is not 32 bytes.
    #[error("Hash must be valid SHA-256 hash")]
    InvalidHash,

    /// Salt is not 16 bytes.
    #[error("Salt must be 16 bytes")]
    InvalidSalt,

    /// Challenge is not hash + nonce + tag bytes long.
    #[error("Invalid challenge size")]
    InvalidChallenge,

    /// A server-assigned field was supplied by the client.
    #[error("Unexpected field \"{0}\" found")]
    UnexpectedField(&'static str),
}
