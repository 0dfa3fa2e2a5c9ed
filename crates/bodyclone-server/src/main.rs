//! BodyClone - static host for the digital twin frontend
//!
//! Serves the WASM bundle and the avatar asset, plus a few health endpoints.

mod api;
mod config;
mod server;
mod state;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "bodyclone")]
#[command(about = "Static host for the BodyClone digital health twin")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "bodyclone.toml")]
    config: PathBuf,

    /// Bind address for web server
    #[arg(short, long)]
    bind: Option<String>,

    /// Directory holding the web bundle
    #[arg(long)]
    web: Option<String>,

    /// Directory served under /assets
    #[arg(long)]
    assets: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write a default configuration file and exit
    #[arg(long)]
    init: bool,
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

    info!("BodyClone v{}", env!("CARGO_PKG_VERSION"));

    if args.init {
        config::save_default_config(&args.config)?;
        info!(path = %args.config.display(), "Wrote default configuration");
        return Ok(());
    }

    let mut config = config::load_config(&args.config)?;

    // Command line overrides
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(web) = args.web {
        config.web.path = web;
    }
    if let Some(assets) = args.assets {
        config.assets.path = assets;
    }

    info!(
        web = %config.web.path,
        assets = %config.assets.path,
        tls = config.server.tls.is_some(),
        "Configuration loaded"
    );

    let state = state::AppState::new(config);
    server::run(state).await
}
