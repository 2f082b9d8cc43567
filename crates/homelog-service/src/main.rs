//! homelog-service - MQTT ingest and query service.
//!
//! Run with: `cargo run -p homelog-service`

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use homelog_service::{Config, mqtt};
use homelog_store::Store;

/// MQTT ingest and query service for homelog telemetry.
#[derive(Parser, Debug)]
#[command(name = "homelog-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Broker URL (overrides config).
    #[arg(short, long)]
    broker: Option<String>,

    /// Database path (overrides config).
    #[arg(short, long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("homelog_service=info".parse()?)
                .add_directive("homelog_store=info".parse()?),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_default(),
    };

    // Override config with CLI args
    if let Some(broker) = args.broker {
        config.mqtt.broker = broker;
    }
    if let Some(db_path) = args.database {
        config.storage.path = db_path;
    }

    config.validate()?;

    // Open the database; schema initialization is idempotent.
    info!("Opening database at {:?}", config.storage.path);
    let store = Store::open(&config.storage.path)?;

    // Run the transport loop until shutdown.
    mqtt::run(store, config.mqtt).await?;

    Ok(())
}
