//! Relay client.
//!
//! All cryptography happens here, on the client. The relay only ever sees
//! the salt, the plaintext hash, the challenge and ciphertext chunks.
//!
//! Upload:
//! ```text
//! file ──sha256──► hash ─┐
//! password ──Argon2id──► key ──► challenge ──► POST /files ──► id
//! file ──► ChunkReader(encrypt) ──► progress ──► PUT /files/{id}
//! ```
//!
//! Download:
//! ```text
//! GET /files/{id}/metadata ──► salt ──► key ──► check challenge
//! GET /files/{id} ──► progress ──► ChunkReader(decrypt) ──► <name>.part + sha256
//!                                                        └─► compare, rename
//! ```

use crate::error::ClientError;
use crate::progress::TransferProgress;
use futures_util::TryStreamExt;
use relay_crypto::{
    chunk_error, create_challenge, derive_key, hash_reader, ChunkKey, ChunkReader, FileHash,
    KdfParams, ProgressReader, Salt, OVERHEAD,
};
use relay_types::{CreateFileResponse, FileId, FileMetadata, CHUNK_SIZE, RAW_CHUNK_SIZE};
use reqwest::header::X_CONTENT_TYPE_OPTIONS;
use reqwest::{Response, StatusCode};
use sha2::{Digest, Sha256};
use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio_util::io::{ReaderStream, StreamReader};
use zeroize::Zeroizing;

/// Encrypted size of a `size`-byte file and its chunk count.
///
/// Advisory only: used for progress and logging, never enforced.
pub fn encrypted_size(size: u64) -> (u64, u64) {
    let chunks = size.div_ceil(RAW_CHUNK_SIZE as u64);
    (size + chunks * OVERHEAD as u64, chunks)
}

/// HTTP client for one relay server.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
    kdf: KdfParams,
}

impl RelayClient {
    /// Create a client for the relay at `server` (e.g. `http://127.0.0.1:8080`).
    pub fn new(server: impl Into<String>) -> Self {
        let base_url = server.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            kdf: KdfParams::DEFAULT,
        }
    }

    /// Use non-default key derivation parameters.
    ///
    /// Uploader and downloader must use the same parameters.
    pub fn with_kdf_params(mut self, params: KdfParams) -> Self {
        self.kdf = params;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Encrypt and upload a file, returning its relay id.
    pub async fn upload_file<P: TransferProgress>(
        &self,
        path: impl AsRef<Path>,
        password: &str,
        progress: &P,
    ) -> Result<FileId, ClientError> {
        let path = path.as_ref();
        if tokio::fs::metadata(path).await?.is_dir() {
            return Err(ClientError::IsDirectory(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ClientError::InvalidMetadata(format!("{} has no file name", path.display())))?;

        let mut file = File::open(path).await?;
        let (hash, size) = hash_reader(&mut file).await?;
        tracing::debug!("Hashed {} ({} bytes): {}", name, size, hex::encode(hash));

        let (key, salt) = self.derive(password, None).await?;
        let meta = FileMetadata {
            name: name.clone(),
            size,
            salt: salt.to_vec(),
            hash: hash.to_vec(),
            challenge: create_challenge(&key, &hash)?,
            ..Default::default()
        };

        let response = self.http.post(self.url("/files")).json(&meta).send().await?;
        let response = expect_status(response, StatusCode::CREATED).await?;
        let CreateFileResponse { id } = serde_json::from_slice(&response.bytes().await?)?;

        let (total, chunks) = encrypted_size(size);
        tracing::info!(
            "Uploading {} as {} ({} bytes in {} chunks)",
            name,
            id,
            total,
            chunks
        );

        file.seek(SeekFrom::Start(0)).await?;
        progress.start(total);
        let observer = progress.clone();
        let body = ProgressReader::new(
            ChunkReader::encrypting(file, RAW_CHUNK_SIZE, key),
            move |n| observer.advance(n),
        );

        let response = self
            .http
            .put(self.url(&format!("/files/{id}")))
            .header(X_CONTENT_TYPE_OPTIONS, "nosniff")
            .body(reqwest::Body::wrap_stream(ReaderStream::new(body)))
            .send()
            .await?;
        expect_status(response, StatusCode::OK).await?;

        progress.finish();
        tracing::info!("Upload of {} complete", id);
        Ok(id)
    }

    /// Download, decrypt and verify a file into `output_dir`.
    ///
    /// Returns the path of the written file. Nothing is left on disk if the
    /// password is wrong or the content fails verification.
    pub async fn download_file<P: TransferProgress>(
        &self,
        id: &FileId,
        password: &str,
        output_dir: impl AsRef<Path>,
        progress: &P,
    ) -> Result<PathBuf, ClientError> {
        let meta = self.fetch_metadata(id).await?;
        let salt = meta
            .kdf_salt()
            .ok_or_else(|| ClientError::InvalidMetadata("salt must be 16 bytes".into()))?;
        let name = safe_file_name(&meta.name)
            .ok_or_else(|| ClientError::InvalidMetadata(format!("unusable file name {:?}", meta.name)))?;

        let (key, _) = self.derive(password, Some(salt)).await?;
        if !meta.check_challenge(&key) {
            return Err(ClientError::IncorrectPassword);
        }

        let response = self.http.get(self.url(&format!("/files/{id}"))).send().await?;
        let response = expect_status(response, StatusCode::OK).await?;

        let (expected_total, _) = encrypted_size(meta.size);
        progress.start(response.content_length().unwrap_or(expected_total));
        tracing::info!("Downloading {} ({}) as {}", id, meta.size, name);

        let body = Box::pin(response.bytes_stream().map_err(io::Error::other));
        let wire = ProgressReader::new(StreamReader::new(body), |n| progress.advance(n));
        let mut plaintext = ChunkReader::decrypting(wire, CHUNK_SIZE, key);

        let output_dir = output_dir.as_ref();
        let part_path = output_dir.join(format!("{name}.part"));
        let final_path = output_dir.join(&name);
        let expected = hex::encode(&meta.hash);

        let actual = match write_and_hash(&mut plaintext, &part_path).await {
            Ok((hash, _)) if hash[..] == meta.hash[..] => {
                tokio::fs::rename(&part_path, &final_path).await?;
                progress.finish();
                tracing::info!("Saved {}", final_path.display());
                return Ok(final_path);
            }
            Ok((hash, _)) => hex::encode(hash),
            Err(e) if chunk_error(&e).is_some() => {
                format!("chunk {} failed authentication", plaintext.chunks_processed() + 1)
            }
            Err(e) => {
                discard(&part_path).await;
                return Err(e.into());
            }
        };

        discard(&part_path).await;
        tracing::warn!("Integrity check failed for {}: {}", id, actual);
        Err(ClientError::IntegrityMismatch { expected, actual })
    }

    /// Metadata of one ready file.
    pub async fn fetch_metadata(&self, id: &FileId) -> Result<FileMetadata, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/files/{id}/metadata")))
            .send()
            .await?;
        let response = expect_status(response, StatusCode::OK).await?;
        Ok(serde_json::from_slice(&response.bytes().await?)?)
    }

    /// Metadata of every ready file on the relay.
    pub async fn list_files(&self) -> Result<Vec<FileMetadata>, ClientError> {
        let response = self.http.get(self.url("/files")).send().await?;
        let response = expect_status(response, StatusCode::OK).await?;
        Ok(serde_json::from_slice(&response.bytes().await?)?)
    }

    /// Run Argon2 off the async runtime.
    async fn derive(
        &self,
        password: &str,
        salt: Option<Salt>,
    ) -> Result<(ChunkKey, Salt), ClientError> {
        let password = Zeroizing::new(password.as_bytes().to_vec());
        let params = self.kdf;
        let derived = tokio::task::spawn_blocking(move || {
            derive_key(&password, salt.as_ref(), params)
        })
        .await
        .map_err(io::Error::other)??;
        Ok(derived)
    }
}

async fn expect_status(response: Response, expected: StatusCode) -> Result<Response, ClientError> {
    if response.status() == expected {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status,
        body: body.trim_end().to_string(),
    })
}

async fn write_and_hash<R: AsyncRead + Unpin>(
    reader: &mut R,
    path: &Path,
) -> io::Result<(FileHash, u64)> {
    let mut file = File::create(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        file.write_all(&buf[..n]).await?;
        total += n as u64;
    }
    file.flush().await?;

    Ok((hasher.finalize().into(), total))
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::debug!("Could not remove {}: {}", path.display(), e);
    }
}

/// Final path component of a relay-supplied name, if it is a usable file name.
fn safe_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next()?;
    match last {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}
