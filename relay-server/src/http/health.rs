//! Health check endpoint.

use crate::server::RelayServer;
use axum::{Extension, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Global start time for uptime calculation.
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize the start time (call once at startup).
pub fn init_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// Health status response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Files created but not yet uploaded.
    pub pending_files: usize,
    /// Files available for download.
    pub ready_files: usize,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Health check handler.
pub async fn health_handler(Extension(relay): Extension<Arc<RelayServer>>) -> Json<HealthStatus> {
    let uptime = START_TIME
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0);

    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        pending_files: relay.store().pending_count(),
        ready_files: relay.store().ready_count(),
        uptime_seconds: uptime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use relay_types::{FileId, FileMetadata};

    #[test]
    fn health_status_serializes() {
        let status = HealthStatus {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            pending_files: 3,
            ready_files: 15,
            uptime_seconds: 3600,
        };

        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"ready_files\":15"));
    }

    #[tokio::test]
    async fn health_counts_files() {
        init_start_time();
        let relay = Arc::new(RelayServer::new(Config::default()));
        relay
            .store()
            .create_pending(FileId::new(), FileMetadata::default());

        let Json(status) = health_handler(Extension(relay)).await;
        assert_eq!(status.status, "ok");
        assert_eq!(status.pending_files, 1);
        assert_eq!(status.ready_files, 0);
    }
}
