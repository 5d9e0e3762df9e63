//! List files held by the relay.

use anyhow::{Context, Result};
use relay_client::{FileMetadata, RelayClient};

/// Run the list command.
pub async fn run(client: &RelayClient) -> Result<()> {
    let mut files = client
        .list_files()
        .await
        .context("Failed to list files")?;
    tracing::debug!("Relay holds {} files", files.len());

    if files.is_empty() {
        println!("No files on relay.");
        return Ok(());
    }

    files.sort_by_key(|f| f.uploaded);
    println!("{:<36}  {:>12}  {:>9}  NAME", "ID", "SIZE", "DOWNLOADS");
    for file in &files {
        println!("{}", format_row(file));
    }
    Ok(())
}

fn format_row(file: &FileMetadata) -> String {
    let id = file.id.map(|id| id.to_string()).unwrap_or_default();
    format!(
        "{:<36}  {:>12}  {:>9}  {}",
        id, file.size, file.downloads, file.name
    )
}
