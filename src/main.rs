//! Catalog Scout main entry point
//!
//! This is the command-line interface for scraping the catalog and searching
//! an exported snapshot.

use anyhow::Context;
use catalog_scout::catalog::CatalogStore;
use catalog_scout::config::{load_config_with_hash, Config};
use catalog_scout::crawler::run_crawl;
use catalog_scout::output::{
    export_catalog, import_catalog, print_report, print_search_results, RunReport,
};
use catalog_scout::search::{FuzzySearchEngine, Threshold};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Catalog Scout: scrape a storefront catalog and fuzzy-search it
///
/// Without a mode flag, crawls the configured site, exports the catalog as
/// CSV and prints a run report.
#[derive(Parser, Debug)]
#[command(name = "catalog-scout")]
#[command(version)]
#[command(about = "Scrape a storefront catalog and fuzzy-search it", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Catalog CSV path, overriding the configured one
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Search the exported catalog instead of crawling
    #[arg(short, long, value_name = "QUERY", conflicts_with_all = ["dry_run", "report"])]
    search: Option<String>,

    /// Minimum match score (0-100) for --search
    #[arg(short, long, value_name = "N", requires = "search")]
    threshold: Option<String>,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["search", "report"])]
    dry_run: bool,

    /// Show a report for the exported catalog and exit
    #[arg(long, conflicts_with_all = ["search", "dry_run"])]
    report: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_deref())?;
    let catalog_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.catalog_path));

    if cli.dry_run {
        handle_dry_run(&config, &catalog_path);
    } else if cli.report {
        handle_report(&catalog_path)?;
    } else if let Some(query) = &cli.search {
        handle_search(&config, &catalog_path, query, cli.threshold.as_deref())?;
    } else {
        handle_crawl(&config, &catalog_path).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_scout=info,warn"),
            1 => EnvFilter::new("catalog_scout=debug,info"),
            2 => EnvFilter::new("catalog_scout=trace,debug"),
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

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config, catalog_path: &Path) {
    println!("=== Catalog Scout Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Max categories: {}", config.site.max_categories);

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!(
        "  Max concurrent fetches: {}",
        config.fetcher.max_concurrent_fetches
    );

    println!("\nSelectors:");
    println!(
        "  Category links: a[class~/{}/]",
        config.selectors.category_link_pattern
    );
    println!(
        "  Product cards: div.{}",
        config.selectors.product_card_class
    );
    let mut price_rules = config.selectors.price.clone();
    price_rules.sort_by_key(|rule| rule.priority);
    for rule in &price_rules {
        println!(
            "  Price [{}] {:?} '{}'{}",
            rule.priority,
            rule.kind,
            rule.value,
            rule.label
                .as_deref()
                .map(|l| format!(" ({})", l))
                .unwrap_or_default()
        );
    }
    println!("  Rating: div.{} > span", config.selectors.rating_class);

    println!("\nSearch threshold: {}", config.search.threshold);
    println!("Catalog output: {}", catalog_path.display());

    println!("\n✓ Configuration is valid");
}

/// Handles the --report mode: summarizes the exported catalog
fn handle_report(catalog_path: &Path) -> anyhow::Result<()> {
    let catalog = import_catalog(catalog_path)
        .with_context(|| format!("failed to load catalog {}", catalog_path.display()))?;
    print_report(&RunReport::from_catalog(&catalog));
    Ok(())
}

/// Handles the --search mode: ranks the exported catalog against a query
fn handle_search(
    config: &Config,
    catalog_path: &Path,
    query: &str,
    threshold: Option<&str>,
) -> anyhow::Result<()> {
    let catalog = import_catalog(catalog_path)
        .with_context(|| format!("failed to load catalog {}", catalog_path.display()))?;
    tracing::debug!("Loaded {} products from {}", catalog.len(), catalog_path.display());

    let default_threshold = Threshold::new(config.search.threshold)?;
    let engine = FuzzySearchEngine::new(Arc::new(CatalogStore::new(catalog)), default_threshold);

    let results = engine.search_raw(query, threshold)?;
    print_search_results(query, &results);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, catalog_path: &Path) -> anyhow::Result<()> {
    let outcome = run_crawl(config).await?;

    let store = CatalogStore::default();
    store.publish(outcome.catalog.clone());

    export_catalog(&store.snapshot(), catalog_path)?;
    print_report(&RunReport::from_outcome(&outcome));
    Ok(())
}
