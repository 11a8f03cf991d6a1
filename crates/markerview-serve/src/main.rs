//! Markerview - static host for the AR page
//!
//! Serves the wasm frontend and the compiled marker datasets, over HTTPS when
//! a certificate is configured.

mod config;
mod server;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "markerview")]
#[command(about = "Serve the Markerview AR page and its marker datasets")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "markerview.toml")]
    config: PathBuf,

    /// Bind address for web server
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Markerview v{}", env!("CARGO_PKG_VERSION"));

    let mut config = config::load_config(&args.config)?;

    // Override bind address if specified
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    info!(
        web_root = %config.web_root.display(),
        dataset_dir = %config.dataset_dir.display(),
        tls = config.tls.is_some(),
        "Configuration loaded"
    );

    server::run(&config).await
}
