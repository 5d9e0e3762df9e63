//! # relay
//!
//! Command-line client for the 0k-Relay zero-knowledge file relay.
//!
//! Exactly one action is run per invocation:
//!
//! - `--upload <path>`: encrypt a file and upload it, printing its id
//! - `--download <id>`: download, decrypt and verify a file
//! - `--list`: show the files currently held by the relay
//! - `--hash <path>`: print the SHA-256 of a local file
//!
//! ## Example
//!
//! ```bash
//! # Share a file
//! relay --server http://relay.example:8080 --upload report.pdf
//!
//! # On the other side, with the id and the password
//! relay --server http://relay.example:8080 --download 0b7c... --output ~/Downloads
//! ```

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use relay_client::{FileId, RelayClient};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

mod commands;

use commands::{download, hash, list, upload};

/// Command-line client for the 0k-Relay file relay.
#[derive(Parser, Debug)]
#[command(name = "relay")]
#[command(version, about, long_about = None)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["upload", "download", "list", "hash"]),
))]
struct Cli {
    /// Relay server URL
    #[arg(long, env = "RELAY_SERVER", default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Encrypt and upload a file
    #[arg(long, value_name = "PATH")]
    upload: Option<PathBuf>,

    /// Download the file with this id
    #[arg(long, value_name = "ID")]
    download: Option<FileId>,

    /// List files available on the relay
    #[arg(long)]
    list: bool,

    /// Print the SHA-256 hash of a local file
    #[arg(long, value_name = "PATH")]
    hash: Option<PathBuf>,

    /// Directory to save downloads into
    #[arg(long, short, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Password for the file (will prompt if not provided)
    #[arg(long, short, env = "RELAY_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    /// Password from the command line or environment, else prompted.
    fn password(&mut self) -> Result<Zeroizing<String>> {
        match self.password.take() {
            Some(pw) => Ok(Zeroizing::new(pw)),
            None => prompt_password("Password: "),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(path) = cli.hash.take() {
        return hash::run(&path).await;
    }

    tracing::debug!("Using relay {}", cli.server);
    let client = RelayClient::new(cli.server.clone());

    if cli.list {
        list::run(&client).await?;
    } else if let Some(path) = cli.upload.take() {
        let password = cli.password()?;
        upload::run(&client, &path, &password).await?;
    } else if let Some(id) = cli.download {
        let password = cli.password()?;
        download::run(&client, &id, &password, &cli.output).await?;
    } else {
        anyhow::bail!("Must specify one of --upload, --download, --list or --hash");
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Prompt for password input with echo suppression.
fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    let password = Zeroizing::new(
        rpassword::prompt_password(prompt).context("Failed to read password")?,
    );
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("relay").chain(args.iter().copied()))
    }

    #[test]
    fn requires_an_action() {
        let err = parse(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_two_actions() {
        let err = parse(&["--list", "--hash", "a.txt"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_malformed_id() {
        let err = parse(&["--download", "not-a-uuid"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn download_defaults() {
        let id = FileId::new();
        let cli = parse(&["--download", &id.to_string(), "--password", "pw"]).unwrap();
        assert_eq!(cli.download, Some(id));
        assert_eq!(cli.output, PathBuf::from("."));
        assert_eq!(cli.password.as_deref(), Some("pw"));
        assert!(!cli.list);
    }

    #[test]
    fn upload_with_server() {
        let cli = parse(&["--server", "http://relay:9000", "--upload", "notes.txt"]).unwrap();
        assert_eq!(cli.server, "http://relay:9000");
        assert_eq!(cli.upload, Some(PathBuf::from("notes.txt")));
    }
}
