mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "talentgeo-cli")]
#[command(about = "Talent radius search command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Geocode zips in batch (rate-limited) and persist the cache.
    Resolve {
        /// Zip codes to resolve.
        #[arg(required = true)]
        zips: Vec<String>,
    },
    /// Find candidates within a radius of a center zip.
    Search {
        #[arg(long)]
        zip: String,
        #[arg(long)]
        radius_miles: f64,
        /// Pin a strategy (native, bounding-box, exhaustive) instead of probing.
        #[arg(long)]
        strategy: Option<String>,
    },
    /// Inspect or reset the durable geocode cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Load candidate fixtures from a YAML file into the store.
    Seed {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum CacheAction {
    Stats,
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = talentgeo_core::load_app_config_from_env()?;
    match cli.command {
        Commands::Resolve { zips } => commands::resolve::run(&config, &zips).await,
        Commands::Search {
            zip,
            radius_miles,
            strategy,
        } => commands::search::run(&config, &zip, radius_miles, strategy.as_deref()).await,
        Commands::Cache { action } => match action {
            CacheAction::Stats => commands::cache::stats(&config),
            CacheAction::Clear => commands::cache::clear(&config),
        },
        Commands::Seed { file } => commands::seed::run(&config, &file).await,
    }
}
