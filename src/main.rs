use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newsharvest::config::{Config, Overrides};

mod commands;

#[derive(Parser)]
#[command(
    name = "newsharvest",
    version,
    about = "Category crawler for the Dantri news site",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); defaults to the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the category once and exit
    Crawl {
        /// Category slug to crawl (e.g. cong-nghe)
        #[arg(long, requires = "category_name")]
        category: Option<String>,

        /// Display name stamped on records (e.g. "Công nghệ")
        #[arg(long)]
        category_name: Option<String>,

        /// Maximum number of listing pages to visit
        #[arg(short, long)]
        max_pages: Option<u32>,

        /// Print the run summary as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Crawl on startup, then once a day at the configured time
    Schedule {
        /// Category slug to crawl (e.g. cong-nghe)
        #[arg(long, requires = "category_name")]
        category: Option<String>,

        /// Display name stamped on records (e.g. "Công nghệ")
        #[arg(long)]
        category_name: Option<String>,

        /// Maximum number of listing pages to visit
        #[arg(short, long)]
        max_pages: Option<u32>,

        /// Daily run time (HH:MM), overrides the configured value
        #[arg(long)]
        run_at: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;

    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "newsharvest starting");

    match cli.command {
        Commands::Crawl {
            category,
            category_name,
            max_pages,
            json,
        } => {
            config.apply_overrides(Overrides {
                category_slug: category,
                category_name,
                max_pages,
                run_at: None,
            })?;
            commands::crawl(config, json).await?;
        }
        Commands::Schedule {
            category,
            category_name,
            max_pages,
            run_at,
        } => {
            config.apply_overrides(Overrides {
                category_slug: category,
                category_name,
                max_pages,
                run_at,
            })?;
            commands::schedule(config).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    }
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("newsharvest=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .or_else(|_| tracing_subscriber::EnvFilter::try_new(format!("newsharvest={level},warn")))
            .context("Invalid log level")?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
