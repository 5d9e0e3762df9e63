//! Encrypt and upload a file.

use anyhow::{Context, Result};
use relay_client::RelayClient;
use std::path::Path;

use super::make_progress_bar;

/// Run the upload command. Prints the new file id on stdout.
pub async fn run(client: &RelayClient, path: &Path, password: &str) -> Result<()> {
    let pb = make_progress_bar("Uploading")?;
    let result = client.upload_file(path, password, &pb).await;
    if result.is_err() {
        pb.abandon();
    }
    let id = result.with_context(|| format!("Failed to upload {}", path.display()))?;

    tracing::info!("Uploaded {} as {}", path.display(), id);
    println!("{}", id);
    Ok(())
}
