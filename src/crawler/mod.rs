//! Crawler module for page fetching and crawl orchestration
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with content-type classification
//! - Pooled link resolvers that fetch and classify a single page
//! - Recursive crawl orchestration with a depth limit

mod fetcher;
mod orchestrator;
mod resolver;

pub use fetcher::{build_http_client, ensure_scheme, HttpFetcher, PageFetcher};
pub use orchestrator::CrawlOrchestrator;
pub use resolver::{LinkResolver, ResolverConfig};

use crate::config::Config;
use crate::output::{CrawlStatistics, JsonFileOutput, OutputHandler};
use crate::Result;
use std::path::PathBuf;

/// Outcome of a finished crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Where the link map was written
    pub output_path: PathBuf,

    /// Summary of the link map
    pub statistics: CrawlStatistics,
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the seed link and scope from the configuration
/// 2. Crawl the site over pooled HTTP fetchers
/// 3. Write the link map as JSON into the output directory
///
/// The configuration is expected to be validated already.
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed and the link map was written
/// * `Err(KrawlError)` - Crawl failed; nothing was written
pub async fn crawl(config: Config) -> Result<CrawlReport> {
    let fetcher_config = config.fetcher.clone();
    crawl_with::<HttpFetcher>(&config, fetcher_config).await
}

/// Runs a complete crawl operation over a custom [`PageFetcher`]
///
/// Same as [`crawl`], except that pages are fetched by `F` built from `fetcher_config`
/// instead of over HTTP. The `[fetcher]` section of `config` is ignored.
pub async fn crawl_with<F: PageFetcher>(
    config: &Config,
    fetcher_config: F::Config,
) -> Result<CrawlReport> {
    let seed = config.seed_link();
    let orchestrator = CrawlOrchestrator::<F>::new(
        fetcher_config,
        config.link_match_config(),
        config.recursion_limit(),
    );

    let link_map = orchestrator.run(&seed).await?;

    tracing::debug!(
        "Pools: {} resolvers ({} free), {} fetchers ({} free)",
        orchestrator.resolver_pool().total_created(),
        orchestrator.resolver_pool().free_count(),
        orchestrator.fetcher_pool().total_created(),
        orchestrator.fetcher_pool().free_count()
    );

    let statistics = CrawlStatistics::from_link_map(&link_map);
    statistics.log();

    let output_path = JsonFileOutput::new(&config.output.directory).write_link_map(&link_map)?;

    Ok(CrawlReport {
        output_path,
        statistics,
    })
}
