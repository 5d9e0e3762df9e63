//! SHA-256 hashing of file contents.

use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Size of a plaintext hash in bytes.
pub const HASH_SIZE: usize = 32;

/// A SHA-256 digest.
pub type FileHash = [u8; HASH_SIZE];

const READ_BUF: usize = 64 * 1024;

/// Hash an in-memory buffer.
pub fn hash_bytes(data: &[u8]) -> FileHash {
    Sha256::digest(data).into()
}

/// Hash everything `reader` yields until end of input.
///
/// Returns the digest and the number of bytes consumed.
pub async fn hash_reader<R: AsyncRead + Unpin>(mut reader: R) -> io::Result<(FileHash, u64)> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_BUF];
    let mut total = 0u64;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n as u64;
    }

    Ok((hasher.finalize().into(), total))
}

/// Hash a file on disk in one streaming pass.
pub async fn hash_file(path: impl AsRef<Path>) -> io::Result<(FileHash, u64)> {
    let file = tokio::fs::File::open(path).await?;
    hash_reader(file).await
}

#[cfg(test)]
mod tests {
    use super::*;

    // sha256("hello")
    const HELLO: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    fn hex(hash: &FileHash) -> String {
        hash.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn known_digest() {
        assert_eq!(hex(&hash_bytes(b"hello")), HELLO);
    }

    #[tokio::test]
    async fn reader_matches_one_shot() {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 256) as u8).collect();
        let (hash, len) = hash_reader(data.as_slice()).await.unwrap();

        assert_eq!(hash, hash_bytes(&data));
        assert_eq!(len, data.len() as u64);
    }

    #[tokio::test]
    async fn empty_input() {
        let (hash, len) = hash_reader(&b""[..]).await.unwrap();
        assert_eq!(len, 0);
        assert_eq!(hash, hash_bytes(b""));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = hash_file("/definitely/not/here").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
