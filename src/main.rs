//! Sumi-Lens main entry point
//!
//! This is the command-line interface for the Sumi-Lens SEO site auditor.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sumi_lens::config::{load_config_with_hash, validate, Config};
use sumi_lens::crawler::{CrawlRequest, HttpFetcher, PageRecord, Session};
use sumi_lens::report::{
    analyze, export_csv, format_markdown_report, format_report, print_statistics, write_json,
    CrawlStatistics,
};
use tracing_subscriber::EnvFilter;

/// Sumi-Lens: a concurrent SEO site auditor
///
/// Sumi-Lens crawls a website from a start address with a fixed pool of
/// workers, bounded by a page cap, and reports structural and SEO problems
/// found on every page.
#[derive(Parser, Debug)]
#[command(name = "sumi-lens")]
#[command(version)]
#[command(about = "A concurrent SEO site auditor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site and report on it
    Crawl {
        /// Start address (absolute http or https URL)
        #[arg(value_name = "URL")]
        url: String,

        /// Maximum number of pages to collect
        #[arg(short = 'n', long)]
        max_pages: Option<usize>,

        /// Number of parallel workers
        #[arg(short, long)]
        workers: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Validate settings and show what would be crawled without crawling
        #[arg(long)]
        dry_run: bool,
    },

    /// Serve the crawl HTTP API
    Serve {
        /// Address to bind, e.g. 127.0.0.1:8080
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl {
            url,
            max_pages,
            workers,
            format,
            output,
            dry_run,
        } => {
            let mut config = config;
            if let Some(max_pages) = max_pages {
                config.crawler.max_pages = max_pages;
            }
            if let Some(workers) = workers {
                config.crawler.workers = workers;
            }
            validate(&config).context("Invalid crawl settings")?;

            if dry_run {
                handle_dry_run(&config, &url)
            } else {
                handle_crawl(&config, &url, format, output.as_deref(), cli.quiet).await
            }
        }
        Command::Serve { bind } => {
            let mut config = config;
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            validate(&config).context("Invalid server settings")?;
            sumi_lens::server::serve(config)
                .await
                .context("Server failed")
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_lens=info,warn"),
            1 => EnvFilter::new("sumi_lens=debug,info"),
            2 => EnvFilter::new("sumi_lens=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(io::stderr)
        .init();
}

/// Loads the config file if one was given, defaults otherwise
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles --dry-run: validates settings and shows what would be crawled
fn handle_dry_run(config: &Config, url: &str) -> anyhow::Result<()> {
    let request = CrawlRequest::new(url, config.crawler.max_pages)?;

    println!("=== Sumi-Lens Dry Run ===\n");

    println!("Crawl:");
    println!("  Start URL: {}", request.start_url());
    println!("  Max pages: {}", request.max_pages());
    println!("  Workers: {}", config.crawler.workers);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    url: &str,
    format: OutputFormat,
    output: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let request = CrawlRequest::new(url, config.crawler.max_pages)?;
    let fetcher = HttpFetcher::new(&config.crawler, &config.user_agent)
        .context("Failed to build HTTP client")?;

    let pages = Session::new(request, Arc::new(fetcher), config.crawler.workers)?
        .run()
        .await
        .context("Crawl failed")?;

    if pages.is_empty() {
        bail!("Crawl of {} produced no pages", url);
    }

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_output(BufWriter::new(file), &pages, format)?;
            tracing::info!("Report written to: {}", path.display());
        }
        None => write_output(io::stdout().lock(), &pages, format)?,
    }

    if !quiet && (output.is_some() || format == OutputFormat::Text) {
        println!();
        print_statistics(&CrawlStatistics::from_pages(&pages));
    }

    Ok(())
}

fn write_output<W: Write>(
    mut writer: W,
    pages: &[PageRecord],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => writer.write_all(format_report(&analyze(pages)).as_bytes())?,
        OutputFormat::Markdown => {
            let markdown =
                format_markdown_report(&analyze(pages), &CrawlStatistics::from_pages(pages));
            writer.write_all(markdown.as_bytes())?;
        }
        OutputFormat::Json => {
            write_json(&mut writer, pages)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => export_csv(&mut writer, pages)?,
    }
    writer.flush()?;
    Ok(())
}
