//! BodyClone Viewer - native desktop entry point

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::Result;
    use bodyclone_core::{Mood, ViewerConfig};
    use clap::Parser;
    use tracing::{info, Level};
    use tracing_subscriber::FmtSubscriber;

    #[derive(Parser, Debug)]
    #[command(name = "bodyclone-viewer")]
    #[command(about = "Digital health twin viewer")]
    #[command(version)]
    pub struct Args {
        /// Mood selected before any dock interaction
        #[arg(short, long, default_value = "calm")]
        pub mood: Mood,

        /// Model path, relative to the asset root or an http(s) URL
        #[arg(short, long)]
        pub asset: Option<String>,

        /// Wait for the viewport to mount before fetching the model
        #[arg(long)]
        pub no_preload: bool,

        /// Log level (trace, debug, info, warn, error)
        #[arg(short, long, default_value = "info")]
        pub log_level: String,
    }

    pub fn viewer_config(args: &Args) -> ViewerConfig {
        let mut config = ViewerConfig {
            default_mood: args.mood,
            preload: !args.no_preload,
            ..ViewerConfig::default()
        };
        if let Some(asset) = &args.asset {
            config.asset_path = asset.clone();
        }
        config
    }

    pub fn main() -> Result<()> {
        let args = Args::parse();

        let level = args.log_level.parse::<Level>().unwrap_or(Level::INFO);
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;

        info!("BodyClone viewer v{}", env!("CARGO_PKG_VERSION"));

        let config = viewer_config(&args);
        info!(mood = %config.default_mood, asset = %config.asset_path, "Starting viewer");
        bodyclone_web::run(config);
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}

// The browser build starts from the library's wasm entry point
#[cfg(target_arch = "wasm32")]
fn main() {}
