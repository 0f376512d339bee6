mod cache;
mod classify;
mod health;
mod runtime;
mod store;

use clap::{Parser, Subcommand};
use hotsearch_core::Platform;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hotsearch-cli")]
#[command(about = "Hot-search aggregator command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show platform health from the cache tier
    Health {
        /// Limit the report to one platform (e.g. weibo)
        platform: Option<Platform>,
    },
    /// Cache maintenance
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
    /// Force a live refresh of every platform, or of one platform
    Refresh {
        #[arg(long)]
        platform: Option<Platform>,
    },
    /// Print the category the classifier assigns to each title
    Classify {
        #[arg(required = true)]
        titles: Vec<String>,
    },
    /// Delete stored rows older than the retention period
    Cleanup,
}

#[derive(Debug, Subcommand)]
enum CacheCommands {
    /// Clear the aggregate and every platform entry
    ClearAll,
    /// Clear one platform's entry
    Clear { platform: Platform },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Classification is offline and needs no configuration.
    if let Some(Commands::Classify { titles }) = &cli.command {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
        classify::run_classify(titles);
        return Ok(());
    }

    let config = hotsearch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Health { platform }) => health::run_health(&config, platform).await?,
        Some(Commands::Cache {
            command: CacheCommands::ClearAll,
        }) => cache::run_clear_all(&config).await?,
        Some(Commands::Cache {
            command: CacheCommands::Clear { platform },
        }) => cache::run_clear_platform(&config, platform).await?,
        Some(Commands::Refresh { platform }) => store::run_refresh(&config, platform).await?,
        Some(Commands::Cleanup) => store::run_cleanup(&config).await?,
        Some(Commands::Classify { .. }) => {}
        None => println!("hotsearch-cli: run with --help for available commands"),
    }

    Ok(())
}
