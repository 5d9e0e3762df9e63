//! # relay-crypto
//!
//! Client-side cryptography for 0k-Relay.
//!
//! Files are never sent to the relay in the clear. The client derives a key
//! from the user's password, splits the file into fixed-size chunks and seals
//! every chunk on its own:
//!
//! ```text
//! password + salt ──Argon2id──► ChunkKey
//!                                  │
//! file ──► [32728 B] ──XChaCha20-Poly1305──► nonce(24) ‖ sealed(32728 + 16) = 32 KiB
//!          [32728 B] ──────────────────────► ...
//!          [tail   ] ──────────────────────► nonce(24) ‖ sealed(tail + 16)
//! ```
//!
//! The SHA-256 of the plaintext is sealed the same way to form the
//! *challenge*, which lets a downloader check their password against the
//! published metadata before fetching the body.
//!
//! ## Example
//!
//! ```rust,ignore
//! use zerok_relay_crypto::{derive_key, ChunkReader, KdfParams, OVERHEAD};
//! use tokio::io::AsyncReadExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (key, salt) = derive_key(b"correct horse", None, KdfParams::DEFAULT)?;
//!
//! let mut sealed = Vec::new();
//! ChunkReader::encrypting(&b"hello"[..], 32 * 1024 - OVERHEAD, key.clone())
//!     .read_to_end(&mut sealed)
//!     .await?;
//! assert_eq!(sealed.len(), 5 + OVERHEAD);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod challenge;
mod cipher;
mod error;
mod hash;
mod kdf;
mod stream;

pub use challenge::{create_challenge, verify_challenge};
pub use cipher::{decrypt_chunk, encrypt_chunk, ChunkKey, KEY_SIZE, NONCE_SIZE, OVERHEAD, TAG_SIZE};
pub use error::CryptoError;
pub use hash::{hash_bytes, hash_file, hash_reader, FileHash, HASH_SIZE};
pub use kdf::{derive_key, generate_salt, KdfParams, Salt, SALT_SIZE};
pub use stream::{chunk_error, ChunkReader, ProgressReader};
