//! Docsift main entry point
//!
//! This is the command-line interface for the Docsift documentation module
//! extractor.

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use docsift::config::{load_config_with_hash, validate, Config};
use docsift::output::{
    print_summary, render, summary_stats, write_output, OutputFormat, RenderOptions,
};
use docsift::url::prepare_seed_url;
use docsift::{Module, Pipeline};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Docsift: a documentation module extractor
///
/// Docsift crawls documentation sites, identifies the product modules they
/// describe, and writes each module with a description and its submodules.
#[derive(Parser, Debug)]
#[command(name = "docsift")]
#[command(version = "1.0.0")]
#[command(about = "Extracts modules and submodules from documentation sites", long_about = None)]
struct Cli {
    /// Documentation URLs to analyze
    #[arg(value_name = "URL", required = true)]
    urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum link depth from each seed
    #[arg(long)]
    max_depth: Option<u32>,

    /// Maximum pages to collect per seed
    #[arg(long)]
    max_pages: Option<usize>,

    /// Number of concurrent fetches
    #[arg(long)]
    concurrency: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Include confidence scores, source URLs and timestamps
    #[arg(long)]
    include_metadata: bool,

    /// Write output to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Generate descriptions with the configured language model
    #[arg(long)]
    use_llm: bool,

    /// Disable the page cache
    #[arg(long)]
    no_cache: bool,

    /// Print summary statistics after the run
    #[arg(long)]
    stats: bool,

    /// Validate config and seeds without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if cli.dry_run {
        return handle_dry_run(&config, &cli.urls);
    }

    handle_extract(config, &cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docsift=info,warn"),
            1 => EnvFilter::new("docsift=debug,info"),
            2 => EnvFilter::new("docsift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (or defaults) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_fetches = concurrency;
    }
    if cli.use_llm {
        config.llm.enabled = true;
    }
    if cli.no_cache {
        config.cache.enabled = false;
    }

    validate(&config).context("invalid settings")?;
    Ok(config)
}

/// Handles the --dry-run mode: validates config and seeds, shows what would run
fn handle_dry_run(config: &Config, urls: &[String]) -> anyhow::Result<()> {
    println!("=== Docsift Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Concurrent fetches: {}", config.crawler.max_concurrent_fetches);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nCache: {}", if config.cache.enabled { "enabled" } else { "disabled" });
    println!(
        "Embeddings: {}",
        if config.embedding.enabled { config.embedding.model.as_str() } else { "disabled" }
    );
    println!("LLM: {}", if config.llm.enabled { config.llm.model.as_str() } else { "disabled" });

    println!("\nSeeds ({}):", urls.len());
    let mut invalid = 0;
    for url in urls {
        match prepare_seed_url(url) {
            Ok(seed) => println!("  - {}", seed),
            Err(e) => {
                invalid += 1;
                println!("  - {} (invalid: {})", url, e);
            }
        }
    }

    if invalid > 0 {
        bail!("{} of {} seed URLs are invalid", invalid, urls.len());
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main extraction: runs every seed and writes all modules
async fn handle_extract(config: Config, cli: &Cli) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_config(config).context("failed to build pipeline")?;

    let mut modules: Vec<Module> = Vec::new();
    let mut failures = 0;

    for url in &cli.urls {
        match pipeline.run(url).await {
            Ok(report) => {
                tracing::info!(
                    "{}: {} modules from {} pages in {} ms",
                    report.seed_url,
                    report.modules.len(),
                    report.pages_crawled,
                    report.duration_ms
                );
                modules.extend(report.modules);
            }
            Err(e) => {
                failures += 1;
                tracing::error!("Failed to process {}: {}", url, e);
            }
        }
    }

    if failures == cli.urls.len() {
        bail!("no URL could be processed");
    }

    let timestamp = Utc::now().to_rfc3339();
    let options = RenderOptions::new(cli.include_metadata, timestamp.clone());

    match &cli.output {
        Some(path) => {
            write_output(&modules, cli.format, &options, path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Wrote {} modules to {}", modules.len(), path.display());
        }
        None => println!("{}", render(&modules, cli.format, &options)?),
    }

    if cli.stats {
        print_summary(&summary_stats(&modules, &timestamp));
    }

    Ok(())
}
