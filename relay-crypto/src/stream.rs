//! Streaming adapters over chunk encryption.
//!
//! [`ChunkReader`] wraps any [`AsyncRead`] byte source and exposes the
//! encrypted (or decrypted) form of that source, one chunk at a time:
//!
//! ```text
//! source ──► [fill chunk_size bytes] ──► encrypt/decrypt ──► buffer ──► caller
//!                    ▲                                           │
//!                    └────────────── refill when drained ◄───────┘
//! ```
//!
//! Only one chunk is held in memory at a time, so arbitrarily large files can
//! be processed while the transformed bytes are written to the network.
//!
//! The encrypting side must read blocks of `CHUNK_SIZE - OVERHEAD` bytes and
//! the decrypting side blocks of `CHUNK_SIZE` bytes, otherwise the chunk
//! boundaries drift and every chunk after the first fails to authenticate.
//!
//! [`ProgressReader`] is a transparent tee that reports the number of bytes
//! passing through it, and composes with either direction.

use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

use crate::cipher::{decrypt_chunk, encrypt_chunk, ChunkKey};
use crate::error::CryptoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Encrypt,
    Decrypt,
}

/// A byte stream that encrypts or decrypts its source chunk by chunk.
///
/// Chunk failures surface as `io::ErrorKind::InvalidData` carrying the
/// [`CryptoError`]; use [`chunk_error`] to recover it.
pub struct ChunkReader<R> {
    inner: R,
    direction: Direction,
    key: ChunkKey,
    /// Raw block being collected from `inner`.
    input: Vec<u8>,
    filled: usize,
    /// Transformed block being served to the caller.
    output: Vec<u8>,
    pos: usize,
    eof: bool,
    chunks: u64,
}

impl<R> ChunkReader<R> {
    /// Encrypt `inner` in plaintext blocks of `chunk_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn encrypting(inner: R, chunk_size: usize, key: ChunkKey) -> Self {
        Self::new(inner, chunk_size, key, Direction::Encrypt)
    }

    /// Decrypt `inner` in ciphertext blocks of `chunk_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn decrypting(inner: R, chunk_size: usize, key: ChunkKey) -> Self {
        Self::new(inner, chunk_size, key, Direction::Decrypt)
    }

    fn new(inner: R, chunk_size: usize, key: ChunkKey, direction: Direction) -> Self {
        assert!(chunk_size > 0, "chunk size must be non-zero");
        Self {
            inner,
            direction,
            key,
            input: vec![0u8; chunk_size],
            filled: 0,
            output: Vec::new(),
            pos: 0,
            eof: false,
            chunks: 0,
        }
    }

    /// Number of chunks transformed so far.
    pub fn chunks_processed(&self) -> u64 {
        self.chunks
    }

    fn transform(&mut self) -> io::Result<()> {
        let block = &self.input[..self.filled];
        let result = match self.direction {
            Direction::Encrypt => encrypt_chunk(&self.key, block),
            Direction::Decrypt => decrypt_chunk(&self.key, block),
        };
        self.filled = 0;

        self.output = result.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pos = 0;
        self.chunks += 1;
        Ok(())
    }
}

impl<R: AsyncRead + Unpin> ChunkReader<R> {
    /// Fill `input` up to the chunk size, stopping early only at end of input.
    fn poll_fill(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        while !self.eof && self.filled < self.input.len() {
            let mut buf = ReadBuf::new(&mut self.input[self.filled..]);
            ready!(Pin::new(&mut self.inner).poll_read(cx, &mut buf))?;
            match buf.filled().len() {
                0 => self.eof = true,
                n => self.filled += n,
            }
        }
        Poll::Ready(Ok(()))
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for ChunkReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        while buf.remaining() > 0 {
            if this.pos < this.output.len() {
                let n = buf.remaining().min(this.output.len() - this.pos);
                buf.put_slice(&this.output[this.pos..this.pos + n]);
                this.pos += n;
                return Poll::Ready(Ok(()));
            }

            ready!(this.poll_fill(cx))?;
            if this.filled == 0 {
                // Source exhausted on a chunk boundary
                return Poll::Ready(Ok(()));
            }
            // An empty plaintext chunk decrypts to nothing; keep looping
            this.transform()?;
        }

        Poll::Ready(Ok(()))
    }
}

/// Extract the chunk failure from an I/O error raised by a [`ChunkReader`].
pub fn chunk_error(err: &io::Error) -> Option<&CryptoError> {
    err.get_ref()
        .and_then(|inner| inner.downcast_ref::<CryptoError>())
}

/// A pass-through reader that reports how many bytes it forwarded.
pub struct ProgressReader<R, F> {
    inner: R,
    on_progress: F,
}

impl<R, F: FnMut(u64)> ProgressReader<R, F> {
    /// Wrap `inner`, calling `on_progress(n)` after every read of `n > 0` bytes.
    pub fn new(inner: R, on_progress: F) -> Self {
        Self { inner, on_progress }
    }
}

impl<R: AsyncRead + Unpin, F: FnMut(u64) + Unpin> AsyncRead for ProgressReader<R, F> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        ready!(Pin::new(&mut this.inner).poll_read(cx, buf))?;

        let n = buf.filled().len() - before;
        if n > 0 {
            (this.on_progress)(n as u64);
        }
        Poll::Ready(Ok(()))
    }
}
