//! # relay-types
//!
//! Wire format types shared by the 0k-Relay server and client:
//! - [`FileId`] - Server-assigned file identifier
//! - [`FileMetadata`] - Public, JSON-encoded description of a file
//! - [`ValidationError`] - Reasons a creation request is refused
//! - [`CHUNK_SIZE`], [`RAW_CHUNK_SIZE`] - Transfer chunking constants

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod metadata;

pub use error::ValidationError;
pub use ids::FileId;
pub use metadata::{CreateFileResponse, FileMetadata, CHALLENGE_SIZE, CHUNK_SIZE, RAW_CHUNK_SIZE};
