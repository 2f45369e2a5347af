//! Profile-Harvest main entry point
//!
//! This is the command-line interface for the profile harvester.

use anyhow::Context;
use clap::Parser;
use profile_harvest::config::{load_config_with_hash, Config};
use profile_harvest::crawler::run_harvest;
use profile_harvest::model::category::{category_code, display_name};
use profile_harvest::url::listing_url;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Profile-Harvest: a paginated profile crawler
///
/// Walks every listing page of each configured category until the
/// end-of-results marker, fetches every profile found, and stores one
/// normalized record per profile.
#[derive(Parser, Debug)]
#[command(name = "profile-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A paginated profile crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching anything
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).with_context(|| format!("loading {}", cli.config.display()));
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_harvest(config, config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("profile_harvest=info,warn"),
            1 => EnvFilter::new("profile_harvest=debug,info"),
            2 => EnvFilter::new("profile_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated config and first listing URLs
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Profile-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Listing pages per batch: {}",
        config.crawler.listing_concurrency
    );
    println!(
        "  Concurrent profile fetches: {}",
        config.crawler.profile_concurrency
    );
    println!(
        "  Timeouts: {}s request, {}s connect",
        config.crawler.request_timeout_secs, config.crawler.connect_timeout_secs
    );

    println!("\nSite:");
    println!("  Listing URL: {}", config.site.listing_url);
    println!("  Profile path: {}", config.site.profile_path);
    println!("  End marker: {:?}", config.site.end_marker);

    println!("\nSelectors:");
    println!("  Headline: {}", config.selectors.headline);
    println!("  Reviews: {}", config.selectors.reviews);
    println!("  Price: {}", config.selectors.price);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nCategories ({}):", config.categories.len());
    for category in &config.categories {
        let first_page = listing_url(&config.site.listing_url, category, 1)
            .with_context(|| format!("building listing URL for '{}'", category))?;
        println!(
            "  - {} [{}] starting at {}",
            display_name(category),
            category_code(category).unwrap_or("?"),
            first_page
        );
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use profile_harvest::output::{load_statistics, print_statistics};
    use profile_harvest::storage::SqliteStorage;

    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))
        .with_context(|| format!("opening {}", config.output.database_path))?;

    let stats = load_statistics(&storage).context("reading statistics")?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, config_hash: String) -> anyhow::Result<()> {
    use profile_harvest::output::print_report;

    tracing::info!(
        "Harvesting {} categories: {}",
        config.categories.len(),
        config.categories.join(", ")
    );

    match run_harvest(config, config_hash).await {
        Ok(report) => {
            tracing::info!("Harvest completed successfully");
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
