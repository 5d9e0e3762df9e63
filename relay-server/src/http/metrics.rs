//! Prometheus metrics endpoint.

use crate::server::RelayServer;
use axum::{http::header::CONTENT_TYPE, response::IntoResponse, Extension};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Prometheus metrics handler.
///
/// Returns metrics in Prometheus text format.
/// Includes both gauges (current state) and counters (monotonic since startup).
pub async fn metrics_handler(Extension(relay): Extension<Arc<RelayServer>>) -> impl IntoResponse {
    let m = relay.metrics();

    // Gauges: current state
    let pending = relay.store().pending_count();
    let ready = relay.store().ready_count();

    // Counters: monotonic since startup
    let created = m.files_created.load(Ordering::Relaxed);
    let completed = m.uploads_completed.load(Ordering::Relaxed);
    let failed = m.uploads_failed.load(Ordering::Relaxed);
    let downloads = m.downloads_total.load(Ordering::Relaxed);
    let bytes_rx = m.bytes_received.load(Ordering::Relaxed);
    let bytes_tx = m.bytes_sent.load(Ordering::Relaxed);

    let body = format!(
        r#"# HELP relay_files_pending Files created and awaiting upload
# TYPE relay_files_pending gauge
relay_files_pending {pending}

# HELP relay_files_ready Files available for download
# TYPE relay_files_ready gauge
relay_files_ready {ready}

# HELP relay_info Server information
# TYPE relay_info gauge
relay_info{{version="{version}"}} 1

# HELP relay_files_created_total Total files created
# TYPE relay_files_created_total counter
relay_files_created_total {created}

# HELP relay_uploads_completed_total Total uploads completed
# TYPE relay_uploads_completed_total counter
relay_uploads_completed_total {completed}

# HELP relay_uploads_failed_total Total uploads rejected or aborted
# TYPE relay_uploads_failed_total counter
relay_uploads_failed_total {failed}

# HELP relay_downloads_total Total completed downloads
# TYPE relay_downloads_total counter
relay_downloads_total {downloads}

# HELP relay_bytes_received_total Total ciphertext bytes received
# TYPE relay_bytes_received_total counter
relay_bytes_received_total {bytes_rx}

# HELP relay_bytes_sent_total Total ciphertext bytes sent
# TYPE relay_bytes_sent_total counter
relay_bytes_sent_total {bytes_tx}
"#,
        version = env!("CARGO_PKG_VERSION"),
    );

    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn counters_are_rendered() {
        let relay = Arc::new(RelayServer::new(Config::default()));
        relay.metrics().files_created.store(7, Ordering::Relaxed);
        relay.metrics().bytes_sent.store(1234, Ordering::Relaxed);

        let response = metrics_handler(Extension(relay)).await.into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(text.contains("relay_files_created_total 7"));
        assert!(text.contains("relay_bytes_sent_total 1234"));
        assert!(text.contains("# TYPE relay_files_ready gauge"));
    }
}
