//! FDNS Ingest - Sonar forward-DNS dataset loader

use anyhow::Result;
use clap::Parser;
use fdns_common::logging::{init_logging, LogConfig, LogLevel};
use fdns_ingest::config::{IngestConfig, SONAR_FDNS_URL};
use fdns_ingest::pipeline;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "fdns-ingest")]
#[command(author, version, about = "Load the Project Sonar forward-DNS dataset into MongoDB")]
struct Cli {
    /// Dataset URL (gzip-compressed, line-delimited JSON)
    #[arg(long, default_value = SONAR_FDNS_URL)]
    url: String,

    /// Read the dataset from a local gzip file instead of the network
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Store connection string
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    mongo_uri: String,

    /// Database holding the target collection
    #[arg(long, default_value = "test_db")]
    database: String,

    /// Collection the records are loaded into
    #[arg(long, default_value = "sonardata")]
    collection: String,

    /// Records per bulk insert
    #[arg(long, default_value_t = 100_000)]
    batch_size: usize,

    /// Keep existing documents instead of dropping the collection first
    #[arg(long)]
    keep_existing: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Environment variables first, then the explicit flag on top
    let mut log_config = LogConfig::from_env().unwrap_or_default();
    log_config.log_file_prefix = "fdns-ingest".to_string();
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }

    init_logging(&log_config)?;

    let config = IngestConfig {
        dataset_url: cli.url,
        local_path: cli.file,
        mongo_uri: cli.mongo_uri,
        database: cli.database,
        collection: cli.collection,
        batch_size: cli.batch_size,
        drop_existing: !cli.keep_existing,
        ..IngestConfig::default()
    };

    // Ctrl-C drains in-flight batches and closes the store before exit.
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, draining");
            signal_token.cancel();
        }
    });

    let summary = pipeline::ingest(&config, token).await?;
    info!("{}", summary.summary());

    Ok(())
}
