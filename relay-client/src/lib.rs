//! # relay-client
//!
//! Client library for the 0k-Relay zero-knowledge file relay.
//!
//! ## Features
//!
//! - **E2E Encryption**: files are sealed chunk by chunk with XChaCha20-Poly1305
//! - **Password Keys**: Argon2id derivation, salt published with the file
//! - **Early Password Check**: the challenge is verified before any body is fetched
//! - **Verified Downloads**: plaintext is re-hashed and compared before it is kept
//! - **Streaming**: memory use is bounded by one chunk in each direction
//!
//! ## Example
//!
//! ```ignore
//! use zerok_relay_client::{NoProgress, RelayClient};
//!
//! let client = RelayClient::new("http://127.0.0.1:8080");
//! let id = client.upload_file("report.pdf", "hunter2", &NoProgress).await?;
//!
//! // Anyone holding the id and password
//! let path = client.download_file(&id, "hunter2", ".", &NoProgress).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod progress;

pub use client::{encrypted_size, RelayClient};
pub use error::ClientError;
pub use progress::{NoProgress, TransferProgress};
pub use relay_types::{FileId, FileMetadata};
