//! relay-server binary entry point.
//!
//! Usage:
//! ```bash
//! relay-server --config relay.toml
//! relay-server --bind 127.0.0.1:8080
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use zerok_relay_server::config::Config;
use zerok_relay_server::http::health;
use zerok_relay_server::server::RelayServer;

/// Zero-knowledge file relay server.
#[derive(Parser, Debug)]
#[command(name = "relay-server")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides server.bind_address)
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }

    health::init_start_time();

    let relay = Arc::new(RelayServer::new(config));
    let listener = relay
        .bind()
        .await
        .with_context(|| format!("Failed to bind {}", relay.config().server.bind_address))?;
    tracing::info!(
        "relay-server v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        listener.local_addr()?
    );

    let signal_relay = relay.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => signal_relay.shutdown(),
            Err(e) => tracing::error!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    relay.serve(listener).await.context("Server error")?;

    tracing::info!("Shutdown complete");
    Ok(())
}
