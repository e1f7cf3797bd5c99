//! Integration tests for the crawler
//!
//! The orchestrator tests drive a crawl over an in-memory site so fetches can be counted.
//! The fetcher tests use wiremock to create mock HTTP servers and exercise the real
//! HTTP fetcher end-to-end.

use krawler::config::{Config, FetcherConfig, RecursionLimit};
use krawler::crawler::{crawl, crawl_with, CrawlOrchestrator, HttpFetcher, PageFetcher};
use krawler::link::LinkMatchConfig;
use krawler::state::CrawlRecord;
use krawler::{FetchError, FetchResult, KrawlError, Pooled};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// In-memory site served by [`MockFetcher`]
///
/// Links without a page fail with a network error; links in `unsupported` fail with an
/// unsupported content type; links in `panicking` panic the fetching task. Every fetch is
/// counted.
#[derive(Default)]
struct MockSite {
    pages: HashMap<String, Vec<String>>,
    unsupported: HashSet<String>,
    panicking: HashSet<String>,
    delay: Option<Duration>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl MockSite {
    fn page(mut self, link: &str, hrefs: &[&str]) -> Self {
        let lines = hrefs
            .iter()
            .map(|href| format!("<a href=\"{}\">link</a>", href))
            .collect();
        self.pages.insert(link.to_string(), lines);
        self
    }

    fn unsupported(mut self, link: &str) -> Self {
        self.unsupported.insert(link.to_string());
        self
    }

    fn panicking(mut self, link: &str) -> Self {
        self.panicking.insert(link.to_string());
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn fetch_count(&self, link: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(link)
            .copied()
            .unwrap_or(0)
    }

    fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }
}

struct MockFetcher {
    site: Arc<MockSite>,
}

impl Pooled for MockFetcher {
    type Config = Arc<MockSite>;

    fn construct(config: &Arc<MockSite>) -> Self {
        Self {
            site: Arc::clone(config),
        }
    }
}

impl PageFetcher for MockFetcher {
    async fn fetch_lines(&self, link: &str) -> FetchResult<Vec<String>> {
        *self
            .site
            .fetches
            .lock()
            .unwrap()
            .entry(link.to_string())
            .or_default() += 1;

        if let Some(delay) = self.site.delay {
            tokio::time::sleep(delay).await;
        }

        if self.site.panicking.contains(link) {
            panic!("fetcher crashed on {}", link);
        }

        if self.site.unsupported.contains(link) {
            return Err(FetchError::UnsupportedContentType {
                link: link.to_string(),
                content_type: "image/png".to_string(),
            });
        }

        self.site
            .pages
            .get(link)
            .cloned()
            .ok_or_else(|| FetchError::Network {
                link: link.to_string(),
                reason: "HTTP 404".to_string(),
            })
    }
}

fn mock_orchestrator(
    site: &Arc<MockSite>,
    subdomain: &str,
    host: &str,
    limit: i64,
) -> Arc<CrawlOrchestrator<MockFetcher>> {
    CrawlOrchestrator::new(
        Arc::clone(site),
        LinkMatchConfig::new(subdomain, host),
        RecursionLimit::from(limit),
    )
}

fn completed(links: &[&str]) -> CrawlRecord {
    CrawlRecord::Completed(links.iter().map(|l| l.to_string()).collect())
}

#[tokio::test]
async fn test_seed_page_classification() {
    let site = Arc::new(MockSite::default().page(
        "www.example-domain.com",
        &[
            "www.thirdparty.com",
            "https://www.example-domain.com/path",
            "/relative/path",
        ],
    ));
    let crawler = mock_orchestrator(&site, "www", "example-domain.com", 2);

    let map = crawler.run("www.example-domain.com").await.unwrap();

    assert_eq!(
        map.get("www.example-domain.com"),
        Some(&completed(&[
            "www.thirdparty.com",
            "https://www.example-domain.com/path",
            "www.example-domain.com/relative/path",
        ]))
    );

    // local links are recorded in page order; the third-party link is never queued
    let keys: Vec<&str> = map.links().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "www.example-domain.com",
            "https://www.example-domain.com/path",
            "www.example-domain.com/relative/path",
        ]
    );
    assert_eq!(
        map.get("https://www.example-domain.com/path"),
        Some(&CrawlRecord::SkippedRecursionLimit)
    );
    assert_eq!(site.fetch_count("www.thirdparty.com"), 0);
}

#[tokio::test]
async fn test_recursion_limit_one_never_fetches() {
    let site = Arc::new(MockSite::default().page("www.example.com/", &["/a", "/b"]));
    let crawler = mock_orchestrator(&site, "www", "example.com", 1);

    let map = crawler.run("www.example.com/").await.unwrap();

    assert_eq!(map.len(), 1);
    assert_eq!(
        map.get("www.example.com/"),
        Some(&CrawlRecord::SkippedRecursionLimit)
    );
    assert_eq!(site.total_fetches(), 0);
}

#[tokio::test]
async fn test_links_beyond_limit_are_not_fetched() {
    let site = Arc::new(
        MockSite::default()
            .page("www.example.com/", &["www.example.com/a"])
            .page("www.example.com/a", &["www.example.com/b"])
            .page("www.example.com/b", &["www.example.com/c"]),
    );
    let crawler = mock_orchestrator(&site, "www", "example.com", 3);

    let map = crawler.run("www.example.com/").await.unwrap();

    assert_eq!(map.get("www.example.com/a"), Some(&completed(&["www.example.com/b"])));
    assert_eq!(
        map.get("www.example.com/b"),
        Some(&CrawlRecord::SkippedRecursionLimit)
    );
    assert!(!map.contains("www.example.com/c"));
    assert_eq!(site.fetch_count("www.example.com/b"), 0);
}

#[tokio::test]
async fn test_shared_link_fetched_once() {
    let site = Arc::new(
        MockSite::default()
            .page(
                "www.example.com/",
                &["www.example.com/a", "www.example.com/b", "www.example.com/a"],
            )
            .page("www.example.com/a", &["www.example.com/c", "www.example.com/"])
            .page("www.example.com/b", &["www.example.com/c", "www.example.com/a"])
            .page("www.example.com/c", &["www.example.com/"])
            .with_delay(Duration::from_millis(20)),
    );
    let crawler = mock_orchestrator(&site, "www", "example.com", -1);

    let map = crawler.run("www.example.com/").await.unwrap();

    for link in [
        "www.example.com/",
        "www.example.com/a",
        "www.example.com/b",
        "www.example.com/c",
    ] {
        assert_eq!(site.fetch_count(link), 1, "{} fetched more than once", link);
        assert!(map.get(link).unwrap().is_settled());
    }
    assert_eq!(map.len(), 4);

    // duplicates within a page are recorded once
    assert_eq!(
        map.get("www.example.com/"),
        Some(&completed(&["www.example.com/a", "www.example.com/b"]))
    );
}

#[tokio::test]
async fn test_unsupported_content_type_is_excluded() {
    let site = Arc::new(
        MockSite::default()
            .page(
                "www.example.com/",
                &["www.example.com/logo.png", "www.example.com/a"],
            )
            .page("www.example.com/a", &["www.example.com/logo.png"])
            .unsupported("www.example.com/logo.png"),
    );
    let crawler = mock_orchestrator(&site, "www", "example.com", 5);

    let map = crawler.run("www.example.com/").await.unwrap();

    assert!(!map.contains("www.example.com/logo.png"));
    assert_eq!(site.fetch_count("www.example.com/logo.png"), 1);

    // the link still shows up in the pages that reference it
    assert_eq!(
        map.get("www.example.com/a"),
        Some(&completed(&["www.example.com/logo.png"]))
    );
}

#[tokio::test]
async fn test_network_error_recorded_as_empty_page() {
    let site = Arc::new(MockSite::default().page("www.example.com/", &["/missing"]));
    let crawler = mock_orchestrator(&site, "www", "example.com", 5);

    let map = crawler.run("www.example.com/").await.unwrap();

    assert_eq!(map.get("www.example.com/missing"), Some(&completed(&[])));
    assert_eq!(site.fetch_count("www.example.com/missing"), 1);
}

#[tokio::test]
async fn test_trailing_slash_seed_skips_bare_host() {
    let site = Arc::new(MockSite::default().page(
        "www.example.com/",
        &["www.example.com", "www.example.com/"],
    ));
    let crawler = mock_orchestrator(&site, "www", "example.com", 5);

    let map = crawler.run("www.example.com/").await.unwrap();

    assert_eq!(map.len(), 1);
    assert!(!map.contains("www.example.com"));
    assert_eq!(site.fetch_count("www.example.com"), 0);
    assert_eq!(site.fetch_count("www.example.com/"), 1);
}

#[tokio::test]
async fn test_other_subdomain_is_not_followed() {
    let site = Arc::new(MockSite::default().page(
        "blog.example.com/",
        &["shop.example.com/", "blog.example.com/post"],
    ));
    let crawler = mock_orchestrator(&site, "blog", "example.com", 5);

    let map = crawler.run("blog.example.com/").await.unwrap();

    assert!(!map.contains("shop.example.com/"));
    assert!(map.contains("blog.example.com/post"));
    assert_eq!(site.fetch_count("shop.example.com/"), 0);
}

#[tokio::test]
async fn test_panicking_branch_fails_run() {
    let site = Arc::new(
        MockSite::default()
            .page(
                "www.example.com/",
                &["www.example.com/ok", "www.example.com/broken"],
            )
            .page("www.example.com/ok", &[])
            .panicking("www.example.com/broken"),
    );
    let crawler = mock_orchestrator(&site, "www", "example.com", 5);

    let err = crawler.run("www.example.com/").await.unwrap_err();

    match err {
        KrawlError::Task(join_error) => assert!(join_error.is_panic()),
        other => panic!("expected a task failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_crawl_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let site = Arc::new(
        MockSite::default()
            .page("www.example.com/", &["/a"])
            .panicking("www.example.com/a"),
    );

    let mut config = Config::default();
    config.crawl.host = "example.com".to_string();
    config.output.directory = dir.path().to_string_lossy().into_owned();

    let result = crawl_with::<MockFetcher>(&config, Arc::clone(&site)).await;

    assert!(matches!(result, Err(KrawlError::Task(_))));
    assert_eq!(site.fetch_count("www.example.com/a"), 1);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_crawl_with_custom_fetcher_writes_link_map() {
    let dir = TempDir::new().unwrap();
    let site = Arc::new(MockSite::default().page("www.example.com/", &["/a"]));

    let mut config = Config::default();
    config.crawl.host = "example.com".to_string();
    config.crawl.recursion_limit = 2;
    config.output.directory = dir.path().to_string_lossy().into_owned();

    let report = crawl_with::<MockFetcher>(&config, Arc::clone(&site)).await.unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report.output_path).unwrap()).unwrap();
    assert_eq!(
        written,
        serde_json::json!({
            "www.example.com/": ["www.example.com/a"],
            "www.example.com/a": "not processed - recursion limit reached"
        })
    );
}

#[tokio::test]
async fn test_pools_shrink_after_fan_out() {
    let hrefs: Vec<String> = (0..8).map(|i| format!("www.example.com/{}", i)).collect();
    let hrefs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
    let site = Arc::new(
        MockSite::default()
            .page("www.example.com/", &hrefs)
            .with_delay(Duration::from_millis(10)),
    );
    let crawler = mock_orchestrator(&site, "www", "example.com", 5);

    let map = crawler.run("www.example.com/").await.unwrap();
    assert_eq!(map.len(), 9);

    for pool_sizes in [
        (
            crawler.fetcher_pool().total_created(),
            crawler.fetcher_pool().free_count(),
        ),
        (
            crawler.resolver_pool().total_created(),
            crawler.resolver_pool().free_count(),
        ),
    ] {
        let (total, free) = pool_sizes;
        assert!(total >= 1);
        assert!(free <= total.div_ceil(2));
    }
}

// HTTP fetcher against a mock server

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

fn http_fetcher() -> HttpFetcher {
    HttpFetcher::construct(&FetcherConfig {
        timeout_secs: 5,
        connect_timeout_secs: 2,
        ..FetcherConfig::default()
    })
}

#[tokio::test]
async fn test_http_fetch_html_lines() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html("<html>\n<a href=\"/x\">x</a>\n</html>"))
        .mount(&mock_server)
        .await;

    let lines = http_fetcher()
        .fetch_lines(&format!("{}/page", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(lines, vec!["<html>", "<a href=\"/x\">x</a>", "</html>"]);
}

#[tokio::test]
async fn test_http_fetch_adds_missing_scheme() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html("ok"))
        .mount(&mock_server)
        .await;

    let address = mock_server.address();
    let lines = http_fetcher()
        .fetch_lines(&format!("{}/page", address))
        .await
        .unwrap();

    assert_eq!(lines, vec!["ok"]);
}

#[tokio::test]
async fn test_http_fetch_error_status_is_network_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = http_fetcher()
        .fetch_lines(&format!("{}/gone", mock_server.uri()))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        FetchError::Network {
            link: format!("{}/gone", mock_server.uri()),
            reason: "HTTP 404".to_string(),
        }
    );
}

#[tokio::test]
async fn test_http_fetch_non_html_is_unsupported() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0x89u8, 0x50, 0x4e, 0x47], "image/png"),
        )
        .mount(&mock_server)
        .await;

    let err = http_fetcher()
        .fetch_lines(&format!("{}/logo", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(err.is_unsupported_content_type());
}

#[tokio::test]
async fn test_http_fetch_stylesheet_skips_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("body {}"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = http_fetcher()
        .fetch_lines(&format!("{}/static/site.css", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(err.is_unsupported_content_type());
}

#[tokio::test]
async fn test_http_fetch_connection_refused_is_network_error() {
    // bind and drop a listener to get a port with nothing behind it
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let err = http_fetcher()
        .fetch_lines(&format!("http://127.0.0.1:{}/", port))
        .await
        .unwrap_err();

    assert!(err.is_network());
}

#[tokio::test]
async fn test_http_crawl_over_mock_server() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(
            "<a href=\"{base}/page1\">1</a>\n<a href=\"{base}/style.css\">css</a>\n<a href=\"{base}/image\">img</a>\n<a href=\"https://www.thirdparty.com/\">3rd</a>"
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html(&format!(
            "<a href=\"{base}/\">home</a> <a href=\"{base}/page2\">2</a>"
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 4], "image/gif"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let crawler: Arc<CrawlOrchestrator<HttpFetcher>> = CrawlOrchestrator::new(
        FetcherConfig::default(),
        LinkMatchConfig::new("", "127.0.0.1"),
        RecursionLimit::Bounded(4),
    );

    let seed = format!("{}/", base);
    let map = crawler.run(&seed).await.unwrap();

    assert_eq!(
        map.get(&seed),
        Some(&CrawlRecord::Completed(vec![
            format!("{}/page1", base),
            format!("{}/style.css", base),
            format!("{}/image", base),
            "https://www.thirdparty.com/".to_string(),
        ]))
    );
    assert_eq!(
        map.get(&format!("{}/page1", base)),
        Some(&CrawlRecord::Completed(vec![
            format!("{}/", base),
            format!("{}/page2", base),
        ]))
    );
    assert_eq!(
        map.get(&format!("{}/page2", base)),
        Some(&CrawlRecord::Completed(Vec::new()))
    );
    assert!(!map.contains(&format!("{}/style.css", base)));
    assert!(!map.contains(&format!("{}/image", base)));
    assert!(!map.contains("https://www.thirdparty.com/"));
    assert_eq!(map.len(), 3);
}

#[tokio::test]
async fn test_crawl_writes_link_map() {
    let dir = TempDir::new().unwrap();

    let mut config = Config::default();
    // reserved TLD, never resolves
    config.crawl.host = "krawler.invalid".to_string();
    config.fetcher.timeout_secs = 2;
    config.fetcher.connect_timeout_secs = 1;
    config.output.directory = dir.path().to_string_lossy().into_owned();

    let report = crawl(config).await.unwrap();

    assert!(report.output_path.starts_with(dir.path()));
    assert_eq!(report.statistics.total_pages, 1);
    assert_eq!(report.statistics.pages_completed, 1);

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report.output_path).unwrap()).unwrap();
    assert_eq!(written, serde_json::json!({ "www.krawler.invalid/": [] }));
}
