//! Link handling module for Krawler
//!
//! This module turns raw hrefs into absolute links and decides which of them belong to the
//! crawl target. Everything here is pure string logic driven by a [`LinkMatchConfig`]; it
//! is deliberately not a general URL parser (no percent-decoding, no query or fragment
//! handling, no `.`/`..` resolution).

mod extract;
mod netloc;

use std::collections::HashSet;

// Re-export main functions
pub use extract::{extract_and_classify, extract_hrefs, ExtractedLinks};
pub use netloc::{hostname_of, is_relative_link, netloc_of};

use netloc::path_of;

/// Subdomain assumed when none is configured
pub const DEFAULT_SUBDOMAIN: &str = "www";

/// Scope rules for a single crawl
///
/// Built once per crawl from the target subdomain and host. The expected host elements are
/// the dot-separated labels of the subdomain (or `www` when it is empty) together with the
/// labels of the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatchConfig {
    subdomain: String,
    host: String,
    expected_host_elements: HashSet<String>,
}

impl LinkMatchConfig {
    /// Creates the scope rules for `subdomain` and `host`
    ///
    /// # Examples
    ///
    /// ```
    /// use krawler::link::LinkMatchConfig;
    ///
    /// let config = LinkMatchConfig::new("", "example-domain.com");
    /// assert!(config.expected_host_elements().contains("www"));
    /// assert!(config.expected_host_elements().contains("example-domain"));
    /// assert!(config.expected_host_elements().contains("com"));
    /// ```
    pub fn new(subdomain: &str, host: &str) -> Self {
        let subdomain_labels = if subdomain.is_empty() {
            DEFAULT_SUBDOMAIN
        } else {
            subdomain
        };

        let expected_host_elements = subdomain_labels
            .split('.')
            .chain(host.split('.'))
            .map(str::to_string)
            .collect();

        Self {
            subdomain: subdomain.to_string(),
            host: host.to_string(),
            expected_host_elements,
        }
    }

    /// The configured subdomain (may be empty)
    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    /// The configured host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Every label an in-scope hostname may be made of
    pub fn expected_host_elements(&self) -> &HashSet<String> {
        &self.expected_host_elements
    }

    /// Resolves a relative href against the page it was found on
    ///
    /// The result is `<subdomain>.<host>`, followed by the parent's path (minus a trailing
    /// segment that looks like a filename), followed by the relative link. The parent's
    /// scheme is not carried over, and `.`/`..` segments are kept literally.
    ///
    /// # Arguments
    ///
    /// * `parent_link` - The link of the page the href was found on
    /// * `relative_link` - The href, already known to be relative
    ///
    /// # Examples
    ///
    /// ```
    /// use krawler::link::LinkMatchConfig;
    ///
    /// let config = LinkMatchConfig::new("www", "example-domain.com");
    /// assert_eq!(
    ///     config.resolve_relative("example-domain.com/existing/path", "relative/path"),
    ///     "www.example-domain.com/existing/path/relative/path"
    /// );
    /// assert_eq!(
    ///     config.resolve_relative("example-domain.com/existing/index.html", "/about"),
    ///     "www.example-domain.com/existing/about"
    /// );
    /// ```
    pub fn resolve_relative(&self, parent_link: &str, relative_link: &str) -> String {
        let prefix = if self.subdomain.is_empty() {
            DEFAULT_SUBDOMAIN
        } else {
            &self.subdomain
        };

        let mut resolved = format!("{}.{}", prefix, self.host);

        if let Some(parent_path) = path_of(parent_link) {
            let parent_path = directory_of(parent_path).trim_end_matches('/');
            if !parent_path.is_empty() {
                resolved.push('/');
                resolved.push_str(parent_path);
            }
        }

        if !relative_link.starts_with('/') {
            resolved.push('/');
        }
        resolved.push_str(relative_link);

        resolved
    }

    /// Checks whether an absolute link belongs to the crawl target
    ///
    /// A link is in scope when its hostname contains the host, contains the subdomain
    /// (unless that is empty or `www`), and is made only of expected host elements.
    ///
    /// Host matching is by substring, so a hostname that merely contains the target host
    /// can slip through, and repeated subdomain labels are not detected.
    ///
    /// # Examples
    ///
    /// ```
    /// use krawler::link::LinkMatchConfig;
    ///
    /// let config = LinkMatchConfig::new("", "example-domain.com");
    /// assert!(config.is_in_scope("www.example-domain.com/x"));
    /// assert!(!config.is_in_scope("other.example-domain.com"));
    /// assert!(!config.is_in_scope("thirdparty.com"));
    /// ```
    pub fn is_in_scope(&self, absolute_link: &str) -> bool {
        let hostname = hostname_of(absolute_link);

        // third-party host
        if !hostname.contains(self.host.as_str()) {
            return false;
        }

        // specified subdomain is absent
        if !self.subdomain.is_empty()
            && self.subdomain != DEFAULT_SUBDOMAIN
            && !hostname.contains(self.subdomain.as_str())
        {
            return false;
        }

        // unexpected label present
        hostname
            .split('.')
            .all(|label| self.expected_host_elements.contains(label))
    }
}

/// Drops a trailing path segment that looks like a filename
fn directory_of(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some((directory, last)) if last.contains('.') => directory,
        None if path.contains('.') => "",
        _ => path,
    }
}
