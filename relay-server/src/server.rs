//! Main RelayServer coordination.
//!
//! RelayServer owns the file store, configuration, metrics and the shutdown
//! token shared by all request handlers.

use crate::config::Config;
use crate::error::Result;
use crate::http::build_router;
use crate::store::FileStore;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Operational metrics for monitoring relay activity.
///
/// All counters are monotonically increasing (reset only on restart).
#[derive(Debug, Default)]
pub struct RelayMetrics {
    /// Total files created (metadata accepted).
    pub files_created: AtomicU64,
    /// Total uploads that completed and became downloadable.
    pub uploads_completed: AtomicU64,
    /// Total uploads rejected or aborted after claiming a file.
    pub uploads_failed: AtomicU64,
    /// Total completed downloads.
    pub downloads_total: AtomicU64,
    /// Total ciphertext bytes received in upload bodies.
    pub bytes_received: AtomicU64,
    /// Total ciphertext bytes sent in download bodies.
    pub bytes_sent: AtomicU64,
}

/// Main relay server.
#[derive(Debug)]
pub struct RelayServer {
    config: Config,
    store: FileStore,
    metrics: RelayMetrics,
    shutdown: CancellationToken,
}

impl RelayServer {
    /// Create a new RelayServer with an empty store.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: FileStore::new(),
            metrics: RelayMetrics::default(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Get the relay configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get access to the file store.
    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Get access to the operational metrics.
    pub fn metrics(&self) -> &RelayMetrics {
        &self.metrics
    }

    /// Token cancelled when the server begins shutting down.
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Begin graceful shutdown: in-flight uploads stop at their next chunk
    /// and the listener drains open connections.
    pub fn shutdown(&self) {
        tracing::info!("Shutdown requested");
        self.shutdown.cancel();
    }

    /// Bind a listener on the configured address.
    pub async fn bind(&self) -> Result<TcpListener> {
        Ok(TcpListener::bind(&self.config.server.bind_address).await?)
    }

    /// Serve HTTP on `listener` until [`shutdown`](Self::shutdown) is called.
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> Result<()> {
        let token = self.shutdown.clone();
        let app = build_router(self);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move { token.cancelled().await })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;

    #[tokio::test]
    async fn serve_stops_on_shutdown() {
        let relay = Arc::new(RelayServer::new(Config::default()));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let handle = tokio::spawn(relay.clone().serve(listener));
        relay.shutdown();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("server did not stop")
            .unwrap();
        assert!(result.is_ok());
        assert!(relay.shutdown_token().is_cancelled());
    }

    #[tokio::test]
    async fn bind_uses_configured_address() {
        let mut config = Config::default();
        config.server.bind_address = "127.0.0.1:0".into();
        let relay = RelayServer::new(config);

        let listener = relay.bind().await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[tokio::test]
    async fn bind_reports_bad_address() {
        let mut config = Config::default();
        config.server.bind_address = "not an address".into();
        let relay = RelayServer::new(config);

        assert!(matches!(relay.bind().await, Err(RelayError::Io(_))));
    }
}
