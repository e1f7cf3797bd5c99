//! Krawler main entry point
//!
//! This is the command-line interface for the Krawler site mapper.

use anyhow::Context;
use clap::Parser;
use krawler::config::{read_config_with_hash, validate, Config};
use krawler::crawler::{build_http_client, crawl};
use krawler::output::print_statistics;
use krawler::KrawlError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Krawler: a shallow site mapper
///
/// Krawler crawls a single host and subdomain from a seed link, follows the local links it
/// finds up to a recursion limit, and writes a JSON map from every visited link to the links
/// found on it.
#[derive(Parser, Debug)]
#[command(name = "krawler")]
#[command(version)]
#[command(about = "A shallow site mapper for a single host", long_about = None)]
struct Cli {
    /// Host to crawl, e.g. example-domain.com
    #[arg(short = 'H', long, required_unless_present = "config")]
    host: Option<String>,

    /// Subdomain to crawl [default: www]
    #[arg(short, long)]
    subdomain: Option<String>,

    /// Path on the host to start from [default: /]
    #[arg(short, long)]
    path: Option<String>,

    /// Maximum crawl depth; -1 means unbounded [default: 5]
    #[arg(short = 'l', long, allow_negative_numbers = true)]
    recursion_limit: Option<i64>,

    /// Directory the link map is written to [default: .]
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line values on top of `config`
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.crawl.host = host.clone();
        }
        if let Some(subdomain) = &self.subdomain {
            config.crawl.subdomain = subdomain.clone();
        }
        if let Some(path) = &self.path {
            config.crawl.path = path.clone();
        }
        if let Some(limit) = self.recursion_limit {
            config.crawl.recursion_limit = limit;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.to_string_lossy().into_owned();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(&cli)?;

    // Fail before crawling if no HTTP client can be built from this configuration
    build_http_client(&config.fetcher)
        .map_err(KrawlError::from)
        .context("Invalid fetcher settings")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let report = crawl(config).await.context("Crawl failed")?;

    if !cli.quiet {
        print_statistics(&report.statistics);
        println!("\nLink map written to: {}", report.output_path.display());
    }

    Ok(())
}

/// Builds the final configuration from the optional file and the command-line flags
fn load_configuration(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = read_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration")?;

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("krawler=info,warn"),
            1 => EnvFilter::new("krawler=debug,info"),
            2 => EnvFilter::new("krawler=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Krawler Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed link: {}", config.seed_link());
    println!("  Host: {}", config.crawl.host);
    println!("  Subdomain: {}", config.crawl.subdomain);
    println!("  Recursion limit: {}", config.recursion_limit());

    let scope = config.link_match_config();
    let mut labels: Vec<_> = scope.expected_host_elements().iter().collect();
    labels.sort();
    println!("  Expected host labels: {:?}", labels);

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Connect timeout: {}s", config.fetcher.connect_timeout_secs);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);

    println!("\n✓ Configuration is valid");
}
