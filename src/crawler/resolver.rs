//! Pooled link resolver
//!
//! A resolver fetches one page through a pooled [`PageFetcher`] and classifies the links found
//! on it against the crawl's scope.

use crate::crawler::fetcher::PageFetcher;
use crate::link::{extract_and_classify, ExtractedLinks, LinkMatchConfig};
use crate::pool::{Pooled, ResourcePool};
use crate::FetchResult;
use std::sync::Arc;

/// Shared configuration every [`LinkResolver`] is built from
pub struct ResolverConfig<F: PageFetcher> {
    fetchers: Arc<ResourcePool<F>>,
    scope: Arc<LinkMatchConfig>,
}

impl<F: PageFetcher> ResolverConfig<F> {
    /// Creates a resolver configuration with a fresh fetcher pool
    pub fn new(fetcher_config: F::Config, scope: LinkMatchConfig) -> Self {
        Self {
            fetchers: Arc::new(ResourcePool::new(fetcher_config)),
            scope: Arc::new(scope),
        }
    }

    /// The fetcher pool shared by all resolvers
    pub fn fetchers(&self) -> &ResourcePool<F> {
        &self.fetchers
    }

    /// The scope links are classified against
    pub fn scope(&self) -> &LinkMatchConfig {
        &self.scope
    }
}

// derive(Clone) would require F: Clone
impl<F: PageFetcher> Clone for ResolverConfig<F> {
    fn clone(&self) -> Self {
        Self {
            fetchers: Arc::clone(&self.fetchers),
            scope: Arc::clone(&self.scope),
        }
    }
}

/// Fetches pages and classifies their links
pub struct LinkResolver<F: PageFetcher> {
    config: ResolverConfig<F>,
}

impl<F: PageFetcher> Pooled for LinkResolver<F> {
    type Config = ResolverConfig<F>;

    fn construct(config: &ResolverConfig<F>) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl<F: PageFetcher> LinkResolver<F> {
    /// The scope links are classified against
    pub fn scope(&self) -> &LinkMatchConfig {
        self.config.scope()
    }

    /// Fetches `link` and returns the links found on it
    ///
    /// The fetcher is returned to its pool whether or not the fetch succeeds. Fetch errors
    /// are passed through unchanged for the caller to classify.
    pub async fn process(&self, link: &str) -> FetchResult<ExtractedLinks> {
        let fetcher = self.config.fetchers.acquire();
        let fetched = fetcher.fetch_lines(link).await;
        self.config.fetchers.release(fetcher);

        let lines = fetched?;
        Ok(extract_and_classify(&lines, link, self.scope()))
    }
}
