//! blobgate -- command-line front end for the blob URL adapter.
//!
//! Loads the YAML configuration, builds an Azure client bound to the
//! configured container, and runs one adapter operation per invocation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use blobgate::adapter::{BlobUrlAdapter, TemporaryUrlOptions};
use blobgate::config::{Config, LoggingConfig};
use blobgate::sas::SasProtocol;
use blobgate::storage::azure::{AzureAuth, AzureBlobClient};
use blobgate::storage::backend::StorageBackend;

/// Command-line arguments for blobgate.
#[derive(Parser, Debug)]
#[command(
    name = "blobgate",
    version,
    about = "Azure Blob Storage adapter with public and signed URLs"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "blobgate.example.yaml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the public URL of a blob.
    Url { path: String },

    /// Print a read-only signed URL of a blob.
    TemporaryUrl {
        path: String,
        /// Lifetime in seconds (defaults to temporary_url.default_ttl_seconds).
        #[arg(long)]
        ttl: Option<u64>,
        /// Allow the URL to be used over plain HTTP as well.
        #[arg(long)]
        allow_http: bool,
        /// Restrict the URL to a client IP or range.
        #[arg(long)]
        ip: Option<String>,
    },

    /// Upload a local file.
    Put { path: String, file: PathBuf },

    /// Download a blob to stdout or a file.
    Get {
        path: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a blob.
    Delete { path: String },

    /// Check whether a blob exists.
    Exists { path: String },

    /// List blobs under a prefix.
    List {
        #[arg(default_value = "")]
        prefix: String,
    },

    /// Show blob properties.
    Stat { path: String },
}

impl Command {
    /// Whether the command talks to the storage service.  URL commands are
    /// pure string work and need no request credentials.
    fn needs_storage(&self) -> bool {
        !matches!(self, Command::Url { .. } | Command::TemporaryUrl { .. })
    }
}

/// Initialize tracing; `RUST_LOG` overrides the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Storage auth: shared key when a key is known, else an env SAS token,
/// else anonymous.
fn resolve_auth(account_key: Option<&str>) -> anyhow::Result<AzureAuth> {
    if let Some(key) = account_key {
        return AzureAuth::shared_key(key);
    }
    if let Ok(sas) = std::env::var("AZURE_STORAGE_SAS_TOKEN") {
        return Ok(AzureAuth::sas_token(&sas));
    }
    warn!("No Azure credentials found; storage requests will be anonymous");
    Ok(AzureAuth::Anonymous)
}

/// Request auth for `command`; commands that never reach the storage
/// service run anonymous so a malformed key cannot block them.
fn command_auth(command: &Command, account_key: Option<&str>) -> anyhow::Result<AzureAuth> {
    if command.needs_storage() {
        resolve_auth(account_key)
    } else {
        Ok(AzureAuth::Anonymous)
    }
}

fn build_adapter(config: &Config, command: &Command) -> anyhow::Result<BlobUrlAdapter> {
    let options = config.storage.adapter_options();
    let auth = command_auth(command, options.account_key.as_deref())?;
    let client = Arc::new(AzureBlobClient::new(
        config.storage.account.clone(),
        config.storage.endpoint.clone(),
        auth,
    )?);
    let backend = Arc::new(client.container(config.storage.container.clone()));
    Ok(BlobUrlAdapter::new(client, backend, options)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = blobgate::config::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;
    init_logging(&config.logging);
    blobgate::metrics::describe_metrics();
    info!("Loaded configuration from {}", cli.config);

    let adapter = build_adapter(&config, &cli.command)?;

    match cli.command {
        Command::Url { path } => println!("{}", adapter.url(&path)),
        Command::TemporaryUrl {
            path,
            ttl,
            allow_http,
            ip,
        } => {
            let ttl = ttl.unwrap_or(config.temporary_url.default_ttl_seconds);
            let ttl = i64::try_from(ttl)
                .ok()
                .and_then(chrono::Duration::try_seconds)
                .context("TTL out of range")?;
            let expiry = chrono::Utc::now() + ttl;
            let options = TemporaryUrlOptions {
                ip_range: ip,
                protocol: if allow_http {
                    SasProtocol::HttpsAndHttp
                } else {
                    SasProtocol::Https
                },
                ..Default::default()
            };
            println!("{}", adapter.temporary_url(&path, expiry, &options)?);
        }
        Command::Put { path, file } => {
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let hash = adapter.put(&path, Bytes::from(data)).await?;
            println!("{}", hash);
        }
        Command::Get { path, output } => {
            let object = adapter.get(&path).await?;
            match output {
                Some(file) => tokio::fs::write(&file, &object.data)
                    .await
                    .with_context(|| format!("Failed to write {}", file.display()))?,
                None => {
                    use std::io::Write;
                    std::io::stdout().write_all(&object.data)?;
                }
            }
        }
        Command::Delete { path } => adapter.delete(&path).await?,
        Command::Exists { path } => {
            let exists = adapter.exists(&path).await?;
            println!("{}", exists);
            if !exists {
                std::process::exit(1);
            }
        }
        Command::List { prefix } => {
            for key in adapter.list(&prefix).await? {
                println!("{}", key);
            }
        }
        Command::Stat { path } => {
            let meta = adapter.metadata(&path).await?;
            println!("size: {}", meta.size);
            if let Some(ct) = meta.content_type {
                println!("content-type: {}", ct);
            }
            if let Some(lm) = meta.last_modified {
                println!("last-modified: {}", lm.to_rfc3339());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAD_KEY: &str = "not base64!";

    #[test]
    fn test_url_commands_skip_storage_auth() {
        let url = Command::Url {
            path: "a.txt".to_string(),
        };
        let temporary = Command::TemporaryUrl {
            path: "a.txt".to_string(),
            ttl: None,
            allow_http: false,
            ip: None,
        };
        for command in [url, temporary] {
            assert!(!command.needs_storage());
            let auth = command_auth(&command, Some(BAD_KEY)).unwrap();
            assert!(matches!(auth, AzureAuth::Anonymous));
        }
    }

    #[test]
    fn test_storage_commands_decode_account_key() {
        let command = Command::Exists {
            path: "a.txt".to_string(),
        };
        assert!(command.needs_storage());
        assert!(command_auth(&command, Some(BAD_KEY)).is_err());
        let auth = command_auth(&command, Some("dGVzdA==")).unwrap();
        assert!(matches!(auth, AzureAuth::SharedKey { .. }));
    }

    #[test]
    fn test_cli_parses_url_command() {
        let cli = Cli::try_parse_from(["blobgate", "url", "images/a.png"]).unwrap();
        assert!(matches!(cli.command, Command::Url { ref path } if path == "images/a.png"));
        assert_eq!(cli.config, "blobgate.example.yaml");
    }
}
