//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, and drive the HTTP API over a real
//! socket.

use std::sync::Arc;
use sumi_lens::config::{Config, CrawlerConfig};
use sumi_lens::crawler::{CrawlRequest, HttpFetcher, PageRecord, Session};
use sumi_lens::report::{analyze, export_csv_string, Finding};
use sumi_lens::server::{serve_on, AppState};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config() -> Config {
    Config {
        crawler: CrawlerConfig {
            max_pages: 50,
            workers: 4,
            request_timeout: 5,
            connect_timeout: 2,
        },
        ..Config::default()
    }
}

async fn mount_html(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

async fn run_session(start_url: &str, max_pages: usize) -> Vec<PageRecord> {
    let config = create_test_config();
    let request = CrawlRequest::new(start_url, max_pages).expect("valid request");
    let fetcher = HttpFetcher::new(&config.crawler, &config.user_agent).expect("http client");
    Session::new(request, Arc::new(fetcher), config.crawler.workers)
        .expect("valid session")
        .run()
        .await
        .expect("crawl succeeds")
}

fn find<'a>(pages: &'a [PageRecord], page_path: &str) -> &'a PageRecord {
    pages
        .iter()
        .find(|p| p.url.path() == page_path)
        .unwrap_or_else(|| panic!("no record for {}", page_path))
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        format!(
            r##"<html><head><title>Home</title>
            <meta name="description" content="The home page">
            </head><body>
            <header></header><nav><a href="/page1">Page 1</a></nav>
            <main><h1>Welcome</h1><a href="{}/page2">Page 2</a><a href="#top">Top</a></main>
            <a href="https://external.invalid/">Elsewhere</a>
            </body></html>"##,
            base_url
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/page1",
        r#"<html><head><title>Page 1</title></head><body><a href="/">Home</a></body></html>"#
            .to_string(),
    )
    .await;
    mount_html(
        &mock_server,
        "/page2",
        r#"<html><head><title>Page 2</title></head><body><h1>A</h1><h3>B</h3></body></html>"#
            .to_string(),
    )
    .await;

    // Only crawl the mock site: 3 internal pages plus the unreachable external one
    let pages = run_session(&format!("{}/", base_url), 10).await;
    assert_eq!(pages.len(), 4);

    let home = find(&pages, "/");
    assert_eq!(home.title, "Home");
    assert_eq!(home.description, "The home page");
    assert_eq!(home.internal_links, 3);
    assert_eq!(home.external_links, 1);
    assert!(home.has_main && home.has_nav && home.has_header);
    assert!(home.referrer.is_none());

    let page1 = find(&pages, "/page1");
    assert_eq!(page1.title, "Page 1");
    assert_eq!(page1.referrer.as_ref().map(|u| u.path()), Some("/"));

    let external = pages
        .iter()
        .find(|p| p.url.host_str() == Some("external.invalid"))
        .expect("external page recorded");
    assert_eq!(external.status_code, 0);

    let report = analyze(&pages);
    let page2 = report
        .pages
        .iter()
        .find(|p| p.url.path() == "/page2")
        .unwrap();
    assert!(page2
        .findings
        .contains(&Finding::SkippedHeading { from: 1, to: 3 }));
}

#[tokio::test]
async fn test_crawl_respects_max_pages() {
    let mock_server = MockServer::start().await;

    let links: String = (0..20)
        .map(|i| format!(r#"<a href="/p{}">p{}</a>"#, i, i))
        .collect();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(links, "text/html"))
        .mount(&mock_server)
        .await;

    let pages = run_session(&format!("{}/", mock_server.uri()), 5).await;
    assert_eq!(pages.len(), 5);

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 5);
}

#[tokio::test]
async fn test_broken_links_are_recorded() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/",
        r#"<a href="/missing">gone</a><a href="/ok">ok</a>"#.to_string(),
    )
    .await;
    mount_html(&mock_server, "/ok", "<title>OK</title>".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let pages = run_session(&format!("{}/", mock_server.uri()), 10).await;
    assert_eq!(pages.len(), 3);

    let missing = find(&pages, "/missing");
    assert_eq!(missing.status_code, 404);
    assert_eq!(missing.referrer.as_ref().map(|u| u.path()), Some("/"));
    assert_eq!(find(&pages, "/ok").status_code, 200);

    let report = analyze(&pages);
    assert_eq!(report.error_count(), 1);
}

#[tokio::test]
async fn test_non_html_resources_are_not_parsed() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/",
        r#"<a href="/file.pdf">pdf</a>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/file.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"<a href="/hidden">x</a>"#, "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let pages = run_session(&format!("{}/", mock_server.uri()), 10).await;

    assert_eq!(pages.len(), 2);
    assert!(pages.iter().all(|p| p.url.path() != "/hidden"));
}

#[tokio::test]
async fn test_cross_host_redirect_classifies_against_final_host() {
    let origin = MockServer::start().await;
    let target = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/landing", target.uri()).as_str()),
        )
        .mount(&origin)
        .await;
    mount_html(
        &target,
        "/landing",
        format!(
            r#"<title>Landing</title><a href="/local">local</a><a href="{}/">origin</a>"#,
            origin.uri()
        ),
    )
    .await;

    let pages = run_session(&format!("{}/moved", origin.uri()), 1).await;
    assert_eq!(pages.len(), 1);

    let page = &pages[0];
    assert_eq!(page.url.as_str(), format!("{}/moved", origin.uri()));
    assert_eq!(page.title, "Landing");
    assert_eq!(page.status_code, 200);
    // Relative links resolve against the landing page on the target server
    assert_eq!(page.internal_links, 1);
    assert_eq!(page.external_links, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_entry_point() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/", "<title>Blocking</title>".to_string()).await;

    let start_url = format!("{}/", mock_server.uri());
    let handle = std::thread::spawn(move || sumi_lens::start_crawl(&start_url, 3));
    let pages = tokio::task::spawn_blocking(move || handle.join())
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].title, "Blocking");
}

#[tokio::test]
async fn test_invalid_start_url_rejected() {
    assert!(sumi_lens::crawl("not a url", 5).await.is_err());
    assert!(sumi_lens::crawl("https://example.com/", 0).await.is_err());
}

/// Starts the API on an ephemeral port and returns its base URL
async fn start_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::from_config(create_test_config()).unwrap();
    tokio::spawn(serve_on(listener, state));
    format!("http://{}", addr)
}

async fn mount_small_site(mock_server: &MockServer) {
    mount_html(
        mock_server,
        "/",
        r#"<title>Root</title><a href="/a">a</a><a href="/b">b</a>"#.to_string(),
    )
    .await;
    mount_html(mock_server, "/a", "<title>A</title>".to_string()).await;
    mount_html(mock_server, "/b", "<title>B</title>".to_string()).await;
}

#[tokio::test]
async fn test_api_post_json() {
    let mock_server = MockServer::start().await;
    mount_small_site(&mock_server).await;
    let api = start_api().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/crawl", api))
        .json(&serde_json::json!({
            "url": format!("{}/", mock_server.uri()),
            "maxPages": 2
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let pages = body.as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert!(pages[0].get("statusCode").is_some());
}

#[tokio::test]
async fn test_api_post_rejects_bad_input() {
    let api = start_api().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/crawl", api))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{}/api/crawl", api))
        .json(&serde_json::json!({"url": "https://example.com/", "maxPages": 0}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{}/api/crawl", api))
        .json(&serde_json::json!({"url": "ftp://example.com/", "maxPages": 3}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_api_get_csv() {
    let mock_server = MockServer::start().await;
    mount_small_site(&mock_server).await;
    let api = start_api().await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/crawl", api))
        .query(&[
            ("url", format!("{}/", mock_server.uri())),
            ("maxPages", "3".to_string()),
            ("format", "csv".to_string()),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "text/csv");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment;filename=seo_report.csv"
    );

    let body = response.text().await.unwrap();
    let mut lines = body.lines();
    assert!(lines.next().unwrap().starts_with("URL,Referrer,StatusCode,Title"));
    assert_eq!(lines.count(), 3);
}

#[tokio::test]
async fn test_api_get_defaults_and_validation() {
    let mock_server = MockServer::start().await;
    mount_small_site(&mock_server).await;
    let api = start_api().await;
    let client = reqwest::Client::new();

    // Missing maxPages falls back to the configured default
    let response = client
        .get(format!("{}/api/crawl", api))
        .query(&[("url", format!("{}/", mock_server.uri()))])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let pages: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(pages.len(), 3);

    let response = client
        .get(format!("{}/api/crawl", api))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .get(format!("{}/api/crawl", api))
        .query(&[("url", "https://example.com/"), ("maxPages", "-4")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_api_rejects_oversized_max_pages() {
    let api = start_api().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/crawl", api))
        .query(&[("url", "https://example.com/"), ("maxPages", "1000000000000")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{}/api/crawl", api))
        .json(&serde_json::json!({
            "url": "https://example.com/",
            "maxPages": 1_000_000_000_000_i64
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // The server is still up for the next client
    let response = client
        .get(format!("{}/api/crawl", api))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[test]
fn test_csv_export_matches_records() {
    let record = PageRecord::empty(url::Url::parse("https://example.com/").unwrap(), None, 200);
    let csv = export_csv_string(&[record]).unwrap();
    assert!(csv.contains("Add a <title> tag."));
}
