//! rechtspraak-scraper CLI entry point

use clap::{Parser, ValueEnum};
use rechtspraak_scraper::{
    commands::{cmd_backfill, cmd_fetch, cmd_index},
    config::Config,
    crawl::build_http_client,
    error::{Error, Result},
    store::{RawStore, RecordStore},
};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "rechtspraak-scraper")]
#[command(version, about = "Scraper for Dutch court decisions on rechtspraak.nl", long_about = None)]
struct Cli {
    /// Phase to run; omit to index and then fetch
    #[arg(long, value_enum)]
    phase: Option<Phase>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit log lines as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Phase {
    /// Discover identifiers through the sitemap feed
    Index,
    /// Download and parse pending decisions
    Fetch,
    /// Re-download raw XML for records missing it
    Backfill,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = Config::from_env()?;
    let client = build_http_client(&config.user_agent)?;
    let store = RecordStore::connect(&config.paths.db_file).await?;
    let raw_store = if config.store_xml {
        Some(RawStore::open(&config.paths.raw_store_dir, &config.raw_bucket)?)
    } else {
        None
    };

    match cli.phase {
        Some(Phase::Index) => {
            run_index(&config, &client, &store).await?;
        }
        Some(Phase::Fetch) => {
            run_fetch(&config, &client, &store, raw_store.as_ref()).await?;
        }
        Some(Phase::Backfill) => {
            let Some(raw) = raw_store.as_ref() else {
                return Err(Error::Config(
                    "Backfill needs the object store; unset STORE_XML=false".to_string(),
                ));
            };
            let stats = cmd_backfill(&config, &client, &store, raw).await?;
            println!("\n✓ Backfill complete");
            println!("  Documents stored: {}", stats.stored);
            println!("  Failed: {}", stats.failed);
        }
        None => {
            run_index(&config, &client, &store).await?;
            run_fetch(&config, &client, &store, raw_store.as_ref()).await?;
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if cli.json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

async fn run_index(
    config: &Config,
    client: &reqwest::Client,
    store: &RecordStore,
) -> Result<()> {
    let stats = cmd_index(config, client, store).await?;

    println!("\n✓ Indexing complete");
    println!("  Identifiers discovered: {}", stats.discovered);
    println!("  Entries skipped: {}", stats.skipped);
    println!("  Windows failed: {}", stats.windows_failed);
    println!("  Known identifiers: {}", store.count_identifiers().await?);
    Ok(())
}

async fn run_fetch(
    config: &Config,
    client: &reqwest::Client,
    store: &RecordStore,
    raw_store: Option<&RawStore>,
) -> Result<()> {
    let stats = cmd_fetch(config, client, store, raw_store).await?;

    println!("\n✓ Fetching complete");
    println!("  Decisions fetched: {}", stats.fetched);
    println!("  Failed (left pending): {}", stats.failed);
    println!("  Pending remaining: {}", store.count_pending().await?);
    Ok(())
}
