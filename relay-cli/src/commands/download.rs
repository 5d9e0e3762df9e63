//! Download, decrypt and verify a file.

use anyhow::{Context, Result};
use relay_client::{FileId, RelayClient};
use std::path::Path;

use super::make_progress_bar;

/// Run the download command.
pub async fn run(
    client: &RelayClient,
    id: &FileId,
    password: &str,
    output_dir: &Path,
) -> Result<()> {
    let pb = make_progress_bar("Downloading")?;
    let result = client.download_file(id, password, output_dir, &pb).await;
    if result.is_err() {
        pb.abandon();
    }
    let path = result.with_context(|| format!("Failed to download {}", id))?;
    tracing::info!("Downloaded {} to {}", id, path.display());

    println!("Saved {}", path.display());
    Ok(())
}
