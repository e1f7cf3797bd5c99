/// Removes a `//`-delimited scheme prefix from a link
///
/// Everything up to and including the first `"//"` is dropped. Links without `"//"` are
/// returned unchanged.
fn strip_scheme(link: &str) -> &str {
    link.split_once("//").map_or(link, |(_, remainder)| remainder)
}

/// Extracts the network location of a link
///
/// The netloc is whatever follows the scheme up to the first `/`. It may still carry a port,
/// and for relative links it is a bare path segment (or empty).
///
/// # Examples
///
/// ```
/// use krawler::link::netloc_of;
///
/// assert_eq!(netloc_of("https://www.example.com:8080/a/b"), "www.example.com:8080");
/// assert_eq!(netloc_of("example.com/a"), "example.com");
/// assert_eq!(netloc_of("/a/b"), "");
/// assert_eq!(netloc_of("a/b"), "a");
/// ```
pub fn netloc_of(link: &str) -> &str {
    let remainder = strip_scheme(link);
    remainder
        .split_once('/')
        .map_or(remainder, |(netloc, _)| netloc)
}

/// Extracts the hostname of a link (the netloc without any `:port` suffix)
///
/// # Examples
///
/// ```
/// use krawler::link::hostname_of;
///
/// assert_eq!(hostname_of("http://www.example.com:8080/path"), "www.example.com");
/// assert_eq!(hostname_of("//cdn.example.com/lib.js"), "cdn.example.com");
/// ```
pub fn hostname_of(link: &str) -> &str {
    let netloc = netloc_of(link);
    netloc.split_once(':').map_or(netloc, |(hostname, _)| hostname)
}

/// Returns the part of a link after its host, without the separating `/`
///
/// Returns `None` when the link has nothing beyond its host.
pub(crate) fn path_of(link: &str) -> Option<&str> {
    strip_scheme(link)
        .split_once('/')
        .map(|(_, path)| path)
        .filter(|path| !path.is_empty())
}

/// Checks whether an href is relative to the page it was found on
///
/// A link is relative when its netloc is empty, `.`, `..`, or contains no `.` at all; that
/// is, it looks like a path segment rather than a dotted hostname.
///
/// # Examples
///
/// ```
/// use krawler::link::is_relative_link;
///
/// assert!(is_relative_link("/a/b"));
/// assert!(is_relative_link("./a"));
/// assert!(is_relative_link("../a"));
/// assert!(is_relative_link("relative/path"));
/// assert!(!is_relative_link("example.com/a"));
/// assert!(!is_relative_link("//third-party.com"));
/// ```
pub fn is_relative_link(link: &str) -> bool {
    let netloc = netloc_of(link);
    netloc.is_empty() || netloc == "." || netloc == ".." || !netloc.contains('.')
}
