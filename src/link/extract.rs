//! Href extraction and classification
//!
//! Page text is scanned line by line for `href="…"` / `href='…'` attributes. This is a plain
//! text scan, not an HTML parse: anchors inside comments or scripts are picked up too.

use crate::link::{is_relative_link, LinkMatchConfig};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Links found on a single page, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    /// Every distinct link on the page, relative hrefs already resolved
    pub all: Vec<String>,

    /// The subset of `all` that is in scope for the crawl
    pub local: Vec<String>,
}

impl ExtractedLinks {
    /// Returns true if the page contained no links at all
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

fn href_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"href=["']([^"']+)["']"#).unwrap())
}

/// Returns the raw href values on a line, in order
///
/// # Examples
///
/// ```
/// use krawler::link::extract_hrefs;
///
/// let line = r#"<a href="/a">A</a> <a href='b.com'>B</a>"#;
/// assert_eq!(extract_hrefs(line).collect::<Vec<_>>(), vec!["/a", "b.com"]);
/// ```
pub fn extract_hrefs(line: &str) -> impl Iterator<Item = &str> {
    href_pattern()
        .captures_iter(line)
        .filter_map(|captures| captures.get(1))
        .map(|href| href.as_str())
}

/// Extracts every link on a page and classifies it against the crawl scope
///
/// Relative hrefs are resolved against `parent_link` before they are stored or classified.
/// Each distinct link is kept the first time it appears anywhere on the page; later
/// duplicates are ignored.
///
/// # Arguments
///
/// * `lines` - The page text, line by line
/// * `parent_link` - The link the page was fetched from
/// * `config` - The crawl's scope rules
///
/// # Example
///
/// ```
/// use krawler::link::{extract_and_classify, LinkMatchConfig};
///
/// let config = LinkMatchConfig::new("www", "example-domain.com");
/// let page = vec![
///     "<a href='www.thirdparty.com'>x</a>".to_string(),
///     "<a href='/relative/path'>y</a>".to_string(),
/// ];
/// let links = extract_and_classify(&page, "www.example-domain.com", &config);
/// assert_eq!(links.all, vec!["www.thirdparty.com", "www.example-domain.com/relative/path"]);
/// assert_eq!(links.local, vec!["www.example-domain.com/relative/path"]);
/// ```
pub fn extract_and_classify<S: AsRef<str>>(
    lines: &[S],
    parent_link: &str,
    config: &LinkMatchConfig,
) -> ExtractedLinks {
    let mut links = ExtractedLinks::default();
    let mut seen = HashSet::new();

    for line in lines {
        for href in extract_hrefs(line.as_ref()) {
            let link = if is_relative_link(href) {
                config.resolve_relative(parent_link, href)
            } else {
                href.to_string()
            };

            if !seen.insert(link.clone()) {
                continue;
            }

            if config.is_in_scope(&link) {
                links.local.push(link.clone());
            }
            links.all.push(link);
        }
    }

    links
}
