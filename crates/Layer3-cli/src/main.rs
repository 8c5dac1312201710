//! Unify CLI - Main entry point

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unify_client::Client;
use unify_foundation::UnifyConfig;

/// Unify - command-line access to a Unify instance
#[derive(Parser, Debug)]
#[command(name = "unify")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Read connection settings from this file instead of the usual locations
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host (overrides env and config)
    #[arg(long)]
    host: Option<String>,

    /// Port (overrides env and config)
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List projects
    Projects,
    /// List datasets
    Datasets,
    /// Refresh (materialize) a dataset
    Refresh {
        /// Dataset id, e.g. `1` for `datasets/1`
        dataset_id: String,

        /// Return as soon as the operation is submitted
        #[arg(long = "async")]
        asynchronous: bool,

        /// Stop waiting after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Show an operation
    Operation {
        /// Operation id
        id: String,
    },
}

fn load_config(args: &Args) -> anyhow::Result<UnifyConfig> {
    let mut config = match &args.config {
        Some(path) => UnifyConfig::load_from(path)?,
        None => UnifyConfig::load()?,
    };

    if args.host.is_some() {
        config.host = args.host.clone();
    }
    if args.port.is_some() {
        config.port = args.port;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = load_config(&args)?;
    let client = Client::from_config(&config)?;
    tracing::debug!("Connected to {}", client.origin());

    match args.command {
        Command::Projects => commands::list_projects(&client).await,
        Command::Datasets => commands::list_datasets(&client).await,
        Command::Refresh {
            dataset_id,
            asynchronous,
            timeout,
        } => commands::refresh_dataset(&client, &dataset_id, asynchronous, timeout).await,
        Command::Operation { id } => commands::show_operation(&client, &id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_refresh() {
        let args = Args::parse_from(["unify", "--port", "9200", "refresh", "3", "--async"]);
        assert_eq!(args.port, Some(9200));
        match args.command {
            Command::Refresh {
                dataset_id,
                asynchronous,
                timeout,
            } => {
                assert_eq!(dataset_id, "3");
                assert!(asynchronous);
                assert_eq!(timeout, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "host = \"from-file\"\nport = 9100\nusername = \"u\"\n").unwrap();

        let args = Args::parse_from([
            "unify",
            "--config",
            path.to_str().unwrap(),
            "--host",
            "from-flag",
            "projects",
        ]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.effective_host(), "from-flag");
        assert_eq!(config.effective_port(), 9100);
        assert_eq!(config.username.as_deref(), Some("u"));
    }
}
