//! Krawler: a shallow site-mapper for a single origin
//!
//! This crate crawls one host/subdomain from a seed link, follows in-scope links up to a
//! recursion limit, and produces a map from every visited link to the links found on it.

pub mod config;
pub mod crawler;
pub mod link;
pub mod output;
pub mod pool;
pub mod state;

use thiserror::Error;

/// Main error type for a crawl run
///
/// Every variant is fatal: the run is aborted and no output is written.
#[derive(Debug, Error)]
pub enum KrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Crawl task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("No host configured (use --host or set crawl.host in the config file)")]
    MissingHost,

    #[error("Validation error: {0}")]
    Validation(String),
}

/// The two classified ways a page fetch can fail
///
/// These are the only errors that cross the fetcher boundary. The orchestrator absorbs
/// `Network` as "no links found" and permanently excludes links that fail with
/// `UnsupportedContentType`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request for {link} failed: {reason}")]
    Network { link: String, reason: String },

    #[error("Unsupported content type for {link}: {content_type}")]
    UnsupportedContentType { link: String, content_type: String },
}

impl FetchError {
    /// Returns true for transport failures and non-success statuses
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Returns true when the link does not point at an HTML page
    pub fn is_unsupported_content_type(&self) -> bool {
        matches!(self, Self::UnsupportedContentType { .. })
    }
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, KrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for page fetches
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::{Config, RecursionLimit};
pub use crawler::{crawl, CrawlOrchestrator, HttpFetcher, LinkResolver, PageFetcher};
pub use link::{ExtractedLinks, LinkMatchConfig};
pub use pool::{Pooled, ResourcePool};
pub use state::{CrawlRecord, CrawlState, Link, LinkMap};
