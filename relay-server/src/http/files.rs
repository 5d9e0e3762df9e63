//! File lifecycle endpoints.
//!
//! - `POST /files` - accept metadata, create a pending file
//! - `PUT /files/:id` - receive the ciphertext body of a pending file
//! - `GET /files/:id` - stream a ready file's ciphertext
//! - `GET /files/:id/metadata` - metadata of a ready file
//! - `GET /files` - metadata of every ready file
//!
//! The relay never sees keys or plaintext. It only checks that the body is
//! made of plausible chunks whose plaintext sizes add up to the declared size.

use crate::error::ApiError;
use crate::server::RelayServer;
use crate::store::FileRecord;
use axum::body::Body;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use bytes::Bytes;
use futures_util::{stream, TryStreamExt};
use relay_crypto::OVERHEAD;
use relay_types::{CreateFileResponse, FileId, FileMetadata, CHUNK_SIZE};
use std::convert::Infallible;
use std::io;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::io::StreamReader;

/// Create a pending file from client metadata.
pub async fn create_file(
    Extension(relay): Extension<Arc<RelayServer>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let meta: FileMetadata =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidJson(e.to_string()))?;
    meta.validate_new(relay.config().limits.max_file_size)?;

    let id = FileId::new();
    let meta = FileMetadata {
        id: Some(id),
        uploaded: unix_now(),
        ..meta
    };

    tracing::info!(
        "Created file {}: name={:?} size={} hash={}",
        id,
        meta.name,
        meta.size,
        hex::encode(&meta.hash)
    );
    relay.store().create_pending(id, meta);
    relay.metrics().files_created.fetch_add(1, Ordering::Relaxed);

    Ok((StatusCode::CREATED, Json(CreateFileResponse { id })))
}

/// Accounts for a claimed upload that never reached the ready set.
///
/// Fires on every abort path, including the handler future being dropped
/// when the client disconnects.
struct ClaimedUpload<'a> {
    relay: &'a RelayServer,
    id: FileId,
    published: bool,
}

impl<'a> ClaimedUpload<'a> {
    fn new(relay: &'a RelayServer, id: FileId) -> Self {
        Self {
            relay,
            id,
            published: false,
        }
    }

    fn publish(mut self, record: FileRecord) {
        self.relay.store().publish_ready(self.id, record);
        self.published = true;
    }
}

impl Drop for ClaimedUpload<'_> {
    fn drop(&mut self) {
        if !self.published {
            self.relay.metrics().uploads_failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Upload for file {} aborted, record dropped", self.id);
        }
    }
}

/// Receive the ciphertext body of a pending file.
///
/// The file is claimed before the first byte is read. If the upload fails
/// for any reason the claimed record is dropped and the id becomes unknown.
pub async fn upload_file(
    Extension(relay): Extension<Arc<RelayServer>>,
    Path(id): Path<String>,
    body: Body,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let mut record = relay
        .store()
        .claim_pending(&id)
        .ok_or(ApiError::NotFound)?;

    tracing::info!("Beginning upload for file {}", id);
    let claim = ClaimedUpload::new(&relay, id);

    match receive_chunks(&relay, &mut record, body).await {
        Ok(stored) => {
            let chunks = record.chunks().len();
            claim.publish(record);

            let m = relay.metrics();
            m.uploads_completed.fetch_add(1, Ordering::Relaxed);
            m.bytes_received.fetch_add(stored, Ordering::Relaxed);
            tracing::info!(
                "Received {} bytes in {} chunks for file {}",
                stored,
                chunks,
                id
            );
            Ok(StatusCode::OK)
        }
        Err(e) => {
            tracing::warn!("Upload for file {} rejected: {}", id, e);
            Err(e)
        }
    }
}

/// Read the body in transport-sized chunks, enforcing the size accounting.
///
/// Returns the number of ciphertext bytes stored.
async fn receive_chunks(
    relay: &RelayServer,
    record: &mut FileRecord,
    body: Body,
) -> Result<u64, ApiError> {
    let body = body.into_data_stream().map_err(io::Error::other);
    let mut reader = StreamReader::new(body);

    let mut plaintext_bytes = 0u64;
    let mut stored_bytes = 0u64;

    loop {
        if relay.shutdown_token().is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let chunk = read_chunk(&mut reader)
            .await
            .map_err(|e| ApiError::BodyRead(e.to_string()))?;
        if chunk.is_empty() {
            break;
        }
        if chunk.len() < OVERHEAD {
            return Err(ApiError::InvalidChunk);
        }

        plaintext_bytes += (chunk.len() - OVERHEAD) as u64;
        if plaintext_bytes > record.size() {
            return Err(ApiError::SizeExceeded);
        }

        let last = chunk.len() < CHUNK_SIZE;
        stored_bytes += chunk.len() as u64;
        record.push_chunk(chunk);
        if last {
            break;
        }
    }

    if plaintext_bytes < record.size() {
        tracing::debug!(
            "Received {} plaintext bytes but expected {}",
            plaintext_bytes,
            record.size()
        );
        return Err(ApiError::SizeShort);
    }

    Ok(stored_bytes)
}

/// Read one chunk: `CHUNK_SIZE` bytes, or fewer only at end of input.
async fn read_chunk<R: AsyncRead + Unpin>(reader: &mut R) -> io::Result<Bytes> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut filled = 0;

    while filled < CHUNK_SIZE {
        match reader.read(&mut buf[filled..]).await? {
            0 => break,
            n => filled += n,
        }
    }

    buf.truncate(filled);
    Ok(Bytes::from(buf))
}

/// Stream the stored ciphertext of a ready file, one body frame per chunk.
pub async fn get_file_contents(
    Extension(relay): Extension<Arc<RelayServer>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let record = relay.store().get_ready(&id).ok_or(ApiError::NotFound)?;
    let total = record.stored_bytes();

    tracing::debug!(
        "Sending file {}: {} bytes in {} chunks",
        id,
        total,
        record.chunks().len()
    );

    let chunks = stream::unfold((record, 0usize), move |(record, index)| {
        let relay = relay.clone();
        async move {
            let chunk = record.chunks().get(index).cloned()?;
            relay
                .metrics()
                .bytes_sent
                .fetch_add(chunk.len() as u64, Ordering::Relaxed);

            if index + 1 == record.chunks().len() {
                let count = record.record_download();
                relay.metrics().downloads_total.fetch_add(1, Ordering::Relaxed);
                tracing::info!("File {} downloaded ({} total)", id, count);
            }
            Some((Ok::<_, Infallible>(chunk), (record, index + 1)))
        }
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .header(header::CONTENT_LENGTH, total)
        .body(Body::from_stream(chunks))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// Metadata of a ready file.
pub async fn get_file_metadata(
    Extension(relay): Extension<Arc<RelayServer>>,
    Path(id): Path<String>,
) -> Result<Json<FileMetadata>, ApiError> {
    let id = parse_id(&id)?;
    let record = relay.store().get_ready(&id).ok_or(ApiError::NotFound)?;
    Ok(Json(record.metadata()))
}

/// Metadata of every ready file.
pub async fn get_file_list(
    Extension(relay): Extension<Arc<RelayServer>>,
) -> Json<Vec<FileMetadata>> {
    let files = relay
        .store()
        .list_ready()
        .iter()
        .map(|record| record.metadata())
        .collect();
    Json(files)
}

// Unparseable ids are indistinguishable from unknown ones
fn parse_id(raw: &str) -> Result<FileId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
