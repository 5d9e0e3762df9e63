//! HTTP endpoints for relay-server.
//!
//! File lifecycle endpoints plus health checks and metrics.

pub mod files;
pub mod health;
mod metrics;

use crate::server::RelayServer;
use axum::{extract::DefaultBodyLimit, routing::get, Extension, Router};
use std::sync::Arc;

pub use health::HealthStatus;

/// Build the HTTP router with all endpoints.
pub fn build_router(relay: Arc<RelayServer>) -> Router {
    let mut router = Router::new()
        .route(
            "/files",
            get(files::get_file_list).post(files::create_file),
        )
        .route(
            "/files/:id",
            get(files::get_file_contents)
                .put(files::upload_file)
                // Upload bodies are streamed chunk by chunk, not buffered
                .layer(DefaultBodyLimit::disable()),
        )
        .route("/files/:id/metadata", get(files::get_file_metadata))
        .route("/health", get(health::health_handler));

    if relay.config().http.metrics_enabled {
        router = router.route("/metrics", get(metrics::metrics_handler));
    }

    router.layer(Extension(relay))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    fn test_relay(config: Config) -> Arc<RelayServer> {
        Arc::new(RelayServer::new(config))
    }

    async fn status_of(app: Router, uri: &str) -> StatusCode {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let app = build_router(test_relay(Config::default()));
        assert_eq!(status_of(app, "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_endpoint_returns_ok() {
        let app = build_router(test_relay(Config::default()));
        assert_eq!(status_of(app, "/metrics").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_endpoint_can_be_disabled() {
        let mut config = Config::default();
        config.http.metrics_enabled = false;
        let app = build_router(test_relay(config));
        assert_eq!(status_of(app, "/metrics").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_list_is_json_array() {
        let app = build_router(test_relay(Config::default()));
        let response = app
            .oneshot(Request::builder().uri("/files").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"[]");
    }
}
