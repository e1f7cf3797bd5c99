use crate::link::LinkMatchConfig;
use serde::Deserialize;

/// Main configuration structure for Krawler
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Builds the seed link the crawl starts from
    ///
    /// The seed is `<subdomain>.<host><path>`, or `<host><path>` when no subdomain is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use krawler::config::Config;
    ///
    /// let mut config = Config::default();
    /// config.crawl.host = "example-domain.com".to_string();
    /// assert_eq!(config.seed_link(), "www.example-domain.com/");
    /// ```
    pub fn seed_link(&self) -> String {
        let crawl = &self.crawl;
        if crawl.subdomain.is_empty() {
            format!("{}{}", crawl.host, crawl.path)
        } else {
            format!("{}.{}{}", crawl.subdomain, crawl.host, crawl.path)
        }
    }

    /// Builds the scope rules links are classified against
    pub fn link_match_config(&self) -> LinkMatchConfig {
        LinkMatchConfig::new(&self.crawl.subdomain, &self.crawl.host)
    }

    /// Returns the recursion limit as a typed value
    pub fn recursion_limit(&self) -> RecursionLimit {
        RecursionLimit::from(self.crawl.recursion_limit)
    }
}

/// What to crawl and how deep
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Target host, e.g. `example-domain.com`
    pub host: String,

    /// Target subdomain; empty means the default `www`
    pub subdomain: String,

    /// Path on the host the crawl starts from
    pub path: String,

    /// Maximum depth a link may be fetched at; negative values mean unbounded
    pub recursion_limit: i64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            subdomain: "www".to_string(),
            path: "/".to_string(),
            recursion_limit: 5,
        }
    }
}

/// HTTP client settings for the page fetcher
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Total request timeout in seconds
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("krawler/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the link-map JSON file is written to
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
        }
    }
}

/// How many hops from the seed a link may be fetched at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionLimit {
    Bounded(u32),
    Unbounded,
}

impl RecursionLimit {
    /// Returns true if a link at `depth` must not be fetched
    ///
    /// The seed is depth 1, so a limit of 1 stops the crawl before the seed is fetched.
    pub fn is_reached(&self, depth: u32) -> bool {
        match self {
            Self::Bounded(limit) => depth >= *limit,
            Self::Unbounded => false,
        }
    }
}

impl From<i64> for RecursionLimit {
    fn from(value: i64) -> Self {
        if value < 0 {
            Self::Unbounded
        } else {
            Self::Bounded(u32::try_from(value).unwrap_or(u32::MAX))
        }
    }
}

impl std::fmt::Display for RecursionLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bounded(limit) => write!(f, "{}", limit),
            Self::Unbounded => write!(f, "unbounded"),
        }
    }
}
