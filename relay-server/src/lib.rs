//! # relay-server
//!
//! Zero-knowledge file relay server for 0k-Relay.
//!
//! This crate implements an HTTP relay that:
//! - Accepts file metadata and hands out an upload id
//! - Receives the encrypted body of each file in fixed-size chunks
//! - Serves the stored ciphertext back to any client that asks
//! - Never sees keys or plaintext (relay is a "dumb pipe")
//!
//! ## Architecture
//!
//! ```text
//! Uploader ──┐                    ┌── Downloader
//!            │     HTTP / JSON    │
//!            ├───────────────────►│
//!            │                    │
//!        ┌───┴────────────────────┴───┐
//!        │        relay-server        │
//!        │  ┌─────────┐ ┌─────────┐   │
//!        │  │ pending │►│  ready  │   │
//!        │  └─────────┘ └─────────┘   │
//!        └────────────────────────────┘
//! ```
//!
//! Storage is in memory only; files live until the process exits.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod http;
pub mod server;
pub mod store;

pub use config::Config;
pub use server::RelayServer;
