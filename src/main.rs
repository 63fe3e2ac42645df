//! Mirror-Crawl main entry point
//!
//! This is the command-line interface for the Mirror-Crawl site mirror.

use clap::Parser;
use mirror_crawl::config::{load_config_with_hash, Config};
use mirror_crawl::crawler::crawl;
use mirror_crawl::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mirror-Crawl: a recursive same-origin site mirror
///
/// Mirror-Crawl fetches a root URL, follows every site-relative link on the
/// same origin, and writes each resource into a directory tree that mirrors
/// the site's paths.
#[derive(Parser, Debug)]
#[command(name = "mirror-crawl")]
#[command(version)]
#[command(about = "A recursive same-origin site mirror", long_about = None)]
struct Cli {
    /// Root URL to mirror (http or https)
    #[arg(value_name = "URL", required_unless_present = "stats")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show statistics from the database and exit
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.stats {
        handle_stats(&config)?;
    } else if let Some(url) = cli.url.as_deref() {
        handle_crawl(url, config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mirror_crawl=info,warn"),
            1 => EnvFilter::new("mirror_crawl=debug,info"),
            2 => EnvFilter::new("mirror_crawl=trace,debug"),
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

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use mirror_crawl::output::{load_statistics, print_statistics};
    use mirror_crawl::storage::SqliteStorage;

    let Some(database_path) = &config.output.database_path else {
        return Err("no database-path configured, nothing to report".into());
    };

    println!("Database: {}\n", database_path.display());

    // Open the database
    let storage = SqliteStorage::new(database_path)?;

    // Load statistics
    let stats = load_statistics(&storage)?;

    // Print statistics
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(url: &str, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Mirroring {} into {}",
        url,
        config.output.directory.display()
    );

    match crawl(url, config).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
