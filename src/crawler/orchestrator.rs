//! Crawl orchestration
//!
//! The orchestrator owns the state of one crawl run and drives a recursive fan-out from the
//! seed link. Every newly discovered local link is processed on its own task; a parent waits
//! for all of its children before it returns, so `run` resolves once the whole tree is done.

use crate::config::RecursionLimit;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::resolver::{LinkResolver, ResolverConfig};
use crate::link::{ExtractedLinks, LinkMatchConfig};
use crate::pool::ResourcePool;
use crate::state::{CrawlState, Link, LinkMap};
use crate::{FetchError, Result};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinSet;

/// Future of one crawl branch
type Branch = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// Drives a crawl run over a pool of resolvers
///
/// An orchestrator runs one crawl at a time; starting a new run discards the records of the
/// previous one. The resolver and fetcher pools are kept across runs.
pub struct CrawlOrchestrator<F: PageFetcher> {
    resolvers: ResourcePool<LinkResolver<F>>,
    recursion_limit: RecursionLimit,
    state: Mutex<CrawlState>,
}

impl<F: PageFetcher> CrawlOrchestrator<F> {
    /// Creates an orchestrator
    ///
    /// # Arguments
    ///
    /// * `fetcher_config` - Configuration every pooled fetcher is built from
    /// * `scope` - Which links count as local
    /// * `recursion_limit` - Depth at which links are recorded instead of fetched
    pub fn new(
        fetcher_config: F::Config,
        scope: LinkMatchConfig,
        recursion_limit: RecursionLimit,
    ) -> Arc<Self> {
        Arc::new(Self {
            resolvers: ResourcePool::new(ResolverConfig::new(fetcher_config, scope)),
            recursion_limit,
            state: Mutex::new(CrawlState::default()),
        })
    }

    /// The pool of link resolvers
    pub fn resolver_pool(&self) -> &ResourcePool<LinkResolver<F>> {
        &self.resolvers
    }

    /// The pool of fetchers shared by every resolver
    pub fn fetcher_pool(&self) -> &ResourcePool<F> {
        self.resolvers.config().fetchers()
    }

    /// Crawls from `base_link` and returns the finished link map
    ///
    /// The seed is processed at depth 1. Network failures are recorded as pages without
    /// links and links with an unsupported content type are left out of the map. Any other
    /// failure in any branch aborts the run.
    pub async fn run(self: &Arc<Self>, base_link: &str) -> Result<LinkMap> {
        tracing::info!(
            "Starting crawl at {} (recursion limit: {})",
            base_link,
            self.recursion_limit
        );

        *self.lock_state() = CrawlState::seeded(base_link);

        Arc::clone(self)
            .process_link(base_link.to_string(), 1)
            .await?;

        let state = std::mem::take(&mut *self.lock_state());
        Ok(state.into_link_map())
    }

    /// Processes one link at `depth`
    ///
    /// Boxed so that the branch can spawn its own children.
    fn process_link(self: Arc<Self>, link: Link, depth: u32) -> Branch {
        Box::pin(async move {
            if self.recursion_limit.is_reached(depth) {
                tracing::debug!("Recursion limit reached at depth {}: {}", depth, link);
                self.lock_state().mark_recursion_limit(&link);
                return Ok(());
            }

            tracing::debug!("Processing {} (depth {})", link, depth);

            let resolver = self.resolvers.acquire();
            let result = resolver.process(&link).await;
            self.resolvers.release(resolver);

            let links = match result {
                Ok(links) => links,
                Err(e @ FetchError::Network { .. }) => {
                    tracing::debug!("{}", e);
                    ExtractedLinks::default()
                }
                Err(e @ FetchError::UnsupportedContentType { .. }) => {
                    tracing::debug!("Excluding link: {}", e);
                    self.lock_state().exclude(&link);
                    return Ok(());
                }
            };

            self.register_links(&link, links, depth).await
        })
    }

    /// Records the links found on `link` and crawls the new local ones one level deeper
    ///
    /// Returns once every spawned branch has finished. The first failing branch fails the
    /// call; its remaining siblings are aborted when the join set is dropped.
    async fn register_links(
        self: &Arc<Self>,
        link: &str,
        links: ExtractedLinks,
        depth: u32,
    ) -> Result<()> {
        // scan-and-mark happens under one lock so no link is queued twice
        let to_recurse = self.lock_state().complete(link, links);
        if to_recurse.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            "{} new local links on {}, descending to depth {}",
            to_recurse.len(),
            link,
            depth + 1
        );

        let mut branches = JoinSet::new();
        for candidate in to_recurse {
            branches.spawn(Arc::clone(self).process_link(candidate, depth + 1));
        }

        while let Some(joined) = branches.join_next().await {
            joined??;
        }

        Ok(())
    }

    fn lock_state(&self) -> MutexGuard<'_, CrawlState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
