//! Page fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - Filtering links that are known not to be pages
//! - Classifying every failure as either a network error or an unsupported content type
//! - Splitting HTML bodies into lines for link extraction

use crate::config::FetcherConfig;
use crate::pool::Pooled;
use crate::{FetchError, FetchResult};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Substrings that mark a link as something other than an HTML page
const UNSUPPORTED_PATTERNS: [&str; 2] = [".css", "cdn-cgi"];

/// Fetches the text of a page, line by line
///
/// Fetchers are pooled, so they are built from a shared configuration value and must be
/// cheap to drop. The only errors a fetcher may report are the two [`FetchError`] kinds.
pub trait PageFetcher: Pooled<Config: Send + Sync + 'static> + Send + Sync + 'static {
    /// Fetches `link` and returns the lines of its body
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - The page text, in order
    /// * `Err(FetchError::Network)` - Transport failure or non-success status
    /// * `Err(FetchError::UnsupportedContentType)` - The link is not an HTML page
    fn fetch_lines(&self, link: &str) -> impl Future<Output = FetchResult<Vec<String>>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use krawler::config::FetcherConfig;
/// use krawler::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Gives a scheme-less link an `http` scheme
///
/// # Examples
///
/// ```
/// use krawler::crawler::ensure_scheme;
///
/// assert_eq!(ensure_scheme("www.example.com"), "http://www.example.com");
/// assert_eq!(ensure_scheme("//www.example.com"), "http://www.example.com");
/// assert_eq!(ensure_scheme("https://www.example.com"), "https://www.example.com");
/// ```
pub fn ensure_scheme(link: &str) -> String {
    match link.split_once("//") {
        None => format!("http://{}", link),
        Some(("", rest)) => format!("http://{}", rest),
        Some(_) => link.to_string(),
    }
}

/// HTTP-backed [`PageFetcher`]
///
/// Each instance owns its own reqwest client, which is why fetchers are pooled.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Option<Client>,
}

impl HttpFetcher {
    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self {
            client: Some(client),
        }
    }
}

impl Pooled for HttpFetcher {
    type Config = FetcherConfig;

    fn construct(config: &FetcherConfig) -> Self {
        match build_http_client(config) {
            Ok(client) => Self::with_client(client),
            Err(e) => {
                tracing::error!("Failed to build HTTP client: {}", e);
                Self { client: None }
            }
        }
    }
}

impl PageFetcher for HttpFetcher {
    /// # Request Flow
    ///
    /// 1. Add an `http` scheme if the link has none
    /// 2. Reject known non-page patterns (`.css`, `cdn-cgi`) without a request
    /// 3. Send a GET request, following redirects
    /// 4. Map the response:
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Unparseable URL | Network |
    /// | Connection refused / timeout / other transport error | Network |
    /// | Non-2xx status | Network |
    /// | Missing or non-`text/html` Content-Type | UnsupportedContentType |
    /// | Body could not be read | Network |
    async fn fetch_lines(&self, link: &str) -> FetchResult<Vec<String>> {
        let url = ensure_scheme(link);

        if let Some(pattern) = UNSUPPORTED_PATTERNS.iter().find(|p| url.contains(*p)) {
            return Err(FetchError::UnsupportedContentType {
                link: link.to_string(),
                content_type: format!("link matches '{}'", pattern),
            });
        }

        let Some(client) = &self.client else {
            return Err(network_error(link, "HTTP client unavailable"));
        };

        let url = Url::parse(&url).map_err(|e| network_error(link, e))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(link, describe_request_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(network_error(link, format!("HTTP {}", status.as_u16())));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("text/html") {
            return Err(FetchError::UnsupportedContentType {
                link: link.to_string(),
                content_type,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| network_error(link, describe_request_error(&e)))?;

        Ok(body.lines().map(str::to_string).collect())
    }
}

fn network_error(link: &str, reason: impl ToString) -> FetchError {
    FetchError::Network {
        link: link.to_string(),
        reason: reason.to_string(),
    }
}

/// Classifies a transport error for logging
fn describe_request_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    }
}
