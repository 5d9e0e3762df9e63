//! Print the SHA-256 of a local file.

use anyhow::{Context, Result};
use std::path::Path;

/// Run the hash command.
pub async fn run(path: &Path) -> Result<()> {
    let (hash, _) = relay_crypto::hash_file(path)
        .await
        .with_context(|| format!("Failed to hash {}", path.display()))?;
    println!("{}", hex::encode(hash));
    Ok(())
}
