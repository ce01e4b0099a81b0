//! Scholar-Crawl main entry point
//!
//! This is the command-line interface for crawling study material into the
//! local index and searching it.

use anyhow::Context;
use clap::{Parser, Subcommand};
use scholar_crawl::config::{load_config_with_hash, Config};
use scholar_crawl::output::{
    load_statistics, print_crawl_report, print_results, print_statistics, print_whitelist,
};
use scholar_crawl::storage::{open_storage, SqliteStore};
use scholar_crawl::{Crawler, DocumentStore, SearchService, Whitelist};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Scholar-Crawl: a polite crawler and search index for study material
///
/// Scholar-Crawl fetches pages only from whitelisted educational sites,
/// keeps their readable text in a local full-text index and ranks search
/// results by source trust, title and length.
#[derive(Parser, Debug)]
#[command(name = "scholar-crawl")]
#[command(version)]
#[command(about = "A polite crawler and search index for study material", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl outward from seed URLs and index what is found
    Crawl {
        /// Topic label stored with every document
        #[arg(short, long)]
        topic: String,

        /// Stop after storing this many documents (defaults to the config value)
        #[arg(long)]
        max_pages: Option<usize>,

        /// Absolute http(s) URLs to start from
        #[arg(required = true, value_name = "SEED")]
        seeds: Vec<String>,
    },

    /// Search the index
    Search {
        /// Words to look for (all must match)
        query: String,

        /// Only return documents with this topic
        #[arg(short, long)]
        topic: Option<String>,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 5)]
        limit: usize,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show statistics from the index
    Stats {
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the configuration and show the whitelist without crawling
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    match cli.command {
        Command::Crawl {
            topic,
            max_pages,
            seeds,
        } => handle_crawl(&config, &topic, max_pages, &seeds).await,
        Command::Search {
            query,
            topic,
            limit,
            json,
        } => handle_search(&config, &query, topic.as_deref(), limit, json),
        Command::Stats { json } => handle_stats(&config, json),
        Command::Check => handle_check(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scholar_crawl=info,warn"),
            1 => EnvFilter::new("scholar_crawl=debug,info"),
            2 => EnvFilter::new("scholar_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(config: &Config) -> anyhow::Result<Arc<SqliteStore>> {
    let path = Path::new(&config.storage.database_path);
    let store = open_storage(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    Ok(Arc::new(store))
}

/// Handles the crawl subcommand
async fn handle_crawl(
    config: &Config,
    topic: &str,
    max_pages: Option<usize>,
    seeds: &[String],
) -> anyhow::Result<()> {
    let store: Arc<dyn DocumentStore> = open_store(config)?;
    let crawler = Crawler::from_config(config, store)?;
    let max_pages = max_pages.unwrap_or(config.crawler.max_pages);

    let report = crawler
        .crawl(seeds, topic, max_pages)
        .await
        .context("Crawl failed")?;

    print_crawl_report(&report, topic);
    Ok(())
}

/// Handles the search subcommand
fn handle_search(
    config: &Config,
    query: &str,
    topic: Option<&str>,
    limit: usize,
    json: bool,
) -> anyhow::Result<()> {
    let store: Arc<dyn DocumentStore> = open_store(config)?;
    let service = SearchService::from_config(config, store);
    let results = service.search(query, topic, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(query, &results);
    }
    Ok(())
}

/// Handles the stats subcommand
fn handle_stats(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let stats = load_statistics(store.as_ref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Database: {}\n", config.storage.database_path);
        print_statistics(&stats);
    }
    Ok(())
}

/// Handles the check subcommand: validates config and shows the whitelist
fn handle_check(config: &Config) -> anyhow::Result<()> {
    let whitelist = Whitelist::from_sites(&config.sites)?;

    println!("=== Scholar-Crawl Configuration ===\n");

    println!("Crawler Configuration:");
    println!("  Default page budget: {}", config.crawler.max_pages);
    println!("  Politeness delay: {}ms", config.crawler.politeness_delay_ms);
    println!("  Minimum text: {} chars", config.crawler.min_text_chars);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);

    println!("\nUser Agent:");
    println!(
        "  {}",
        scholar_crawl::crawler::user_agent_string(&config.user_agent)
    );

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);
    println!();

    print_whitelist(&whitelist);

    println!("\nTrust:");
    for site in &config.sites {
        println!("  {}: {:+}", site.domain, site.trust);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}
