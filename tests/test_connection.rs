//! End-to-end tests driving a connection over an in-memory duplex stream.

use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;

use statik::config::Config;
use statik::http::connection::Connection;
use statik::site::Site;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const BAD_REQUEST: &str = "HTTP/1.1 400 Bad Request\r\nContent-Type: text/html\r\n\r\n<p>badrequest</p>";
const NOT_FOUND: &str = "HTTP/1.1 404 Not Found\r\nContent-Type: text/html\r\n\r\n<p>not found</p>";
const PNG: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n', 0x00, 0x01];

struct Fixture {
    dir: TempDir,
    cfg: Config,
}

impl Fixture {
    fn new(redirects: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        fs::write(root.join("index.html"), "<html>\n<body>home</body>\n</html>\n").unwrap();
        fs::write(root.join("logo.png"), PNG).unwrap();
        fs::create_dir(root.join("docs")).unwrap();
        fs::write(root.join("docs").join("guide.html"), "guide\n").unwrap();

        fs::create_dir(root.join("errorfiles")).unwrap();
        fs::write(root.join("errorfiles/Error-400.html"), "<p>bad\nrequest</p>\n").unwrap();
        fs::write(root.join("errorfiles/Error-404.html"), "<p>not found</p>\n").unwrap();
        fs::write(root.join("errorfiles/Moved-301.html"), "<p>moved</p>\n").unwrap();
        fs::write(root.join("moved.log"), redirects).unwrap();

        let mut cfg = Config::default();
        cfg.server.header_timeout_secs = 5;
        cfg.site.document_root = root.to_path_buf();
        cfg.site.redirects_file = root.join("moved.log");
        cfg.templates.bad_request = root.join("errorfiles/Error-400.html");
        cfg.templates.not_found = root.join("errorfiles/Error-404.html");
        cfg.templates.moved_permanently = root.join("errorfiles/Moved-301.html");

        Self { dir, cfg }
    }

    fn site(&self) -> Arc<Site> {
        Arc::new(Site::from_config(&self.cfg))
    }
}

fn peer() -> SocketAddr {
    "127.0.0.1:50000".parse().unwrap()
}

/// Sends `request`, half-closes the client side and returns everything the
/// server wrote before closing.
async fn exchange(site: Arc<Site>, request: &[u8]) -> Vec<u8> {
    let (mut client, server) = tokio::io::duplex(64 * 1024);
    let handle = tokio::spawn(Connection::new(server, peer(), site).run());

    client.write_all(request).await.unwrap();
    client.shutdown().await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    handle.await.unwrap().unwrap();
    response
}

async fn exchange_text(site: Arc<Site>, request: &str) -> String {
    String::from_utf8(exchange(site, request.as_bytes()).await).unwrap()
}

#[tokio::test]
async fn test_root_serves_default_resource() {
    let fixture = Fixture::new("");
    let response =
        exchange_text(fixture.site(), "GET / HTTP/1.1\r\nHost: 127.0.0.1:6789\r\n\r\n").await;

    assert_eq!(
        response,
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<html><body>home</body></html>"
    );
}

#[tokio::test]
async fn test_missing_html_is_not_found() {
    let fixture = Fixture::new("");
    let response = exchange_text(
        fixture.site(),
        "GET /missing.html HTTP/1.1\r\nHost: 127.0.0.1:6789\r\n\r\n",
    )
    .await;

    assert_eq!(response, NOT_FOUND);
}

#[tokio::test]
async fn test_moved_resource_redirects() {
    let fixture = Fixture::new("http://127.0.0.1:6789/old.html->http://127.0.0.1:6789/new.html\n");
    let response = exchange_text(
        fixture.site(),
        "GET /old.html HTTP/1.1\r\nHost: 127.0.0.1:6789\r\n\r\n",
    )
    .await;

    assert_eq!(
        response,
        "HTTP/1.1 301 Moved Permanently\r\nLocation: http://127.0.0.1:6789/new.html\r\nContent-Type: text/html\r\n\r\n<p>moved</p>"
    );
}

#[tokio::test]
async fn test_redirect_ignores_trailing_slash_on_request() {
    let fixture = Fixture::new("http://127.0.0.1:6789/old->http://127.0.0.1:6789/new\n");
    let response = exchange_text(
        fixture.site(),
        "GET /old/ HTTP/1.1\r\nHost: 127.0.0.1:6789\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 301 Moved Permanently\r\nLocation: http://127.0.0.1:6789/new\r\n"));
}

#[tokio::test]
async fn test_redirect_requires_matching_host() {
    let fixture = Fixture::new("http://127.0.0.1:6789/old.html->http://127.0.0.1:6789/new.html\n");
    let response = exchange_text(
        fixture.site(),
        "GET /old.html HTTP/1.1\r\nHost: www.example.com:6789\r\n\r\n",
    )
    .await;

    assert_eq!(response, NOT_FOUND);
}

#[tokio::test]
async fn test_existing_file_wins_over_redirect() {
    let fixture = Fixture::new("http://127.0.0.1:6789/index.html->http://127.0.0.1:6789/new.html\n");
    let response = exchange_text(
        fixture.site(),
        "GET /index.html HTTP/1.1\r\nHost: 127.0.0.1:6789\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
}

#[tokio::test]
async fn test_image_served_as_raw_bytes() {
    let fixture = Fixture::new("");
    let response = exchange(
        fixture.site(),
        b"GET /logo.png HTTP/1.0\r\nHost: 127.0.0.1:6789\r\nAccept: image/png\r\n\r\n",
    )
    .await;

    let mut expected = b"HTTP/1.1 200 OK\r\nContent-Type: image\r\n\r\n".to_vec();
    expected.extend_from_slice(PNG);
    assert_eq!(response, expected);
}

#[tokio::test]
async fn test_missing_image_is_not_found_without_redirect() {
    let fixture = Fixture::new("http://127.0.0.1:6789/gone.png->http://127.0.0.1:6789/logo.png\n");
    let response = exchange_text(
        fixture.site(),
        "GET /gone.png HTTP/1.1\r\nHost: 127.0.0.1:6789\r\n\r\n",
    )
    .await;

    assert_eq!(response, NOT_FOUND);
}

#[tokio::test]
async fn test_nested_resource() {
    let fixture = Fixture::new("");
    let response = exchange_text(
        fixture.site(),
        "GET /docs/guide.html HTTP/1.1\r\nHost: 127.0.0.1:6789\r\n\r\n",
    )
    .await;

    assert_eq!(response, "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\nguide");
}

#[tokio::test]
async fn test_directory_is_not_found() {
    let fixture = Fixture::new("");
    let response = exchange_text(
        fixture.site(),
        "GET /docs/ HTTP/1.1\r\nHost: 127.0.0.1:6789\r\n\r\n",
    )
    .await;

    assert_eq!(response, NOT_FOUND);
}

#[tokio::test]
async fn test_head_gets_full_response() {
    let fixture = Fixture::new("");
    let response =
        exchange_text(fixture.site(), "HEAD / HTTP/1.1\r\nHost: 127.0.0.1:6789\r\n\r\n").await;

    assert!(response.ends_with("<html><body>home</body></html>"));
}

#[tokio::test]
async fn test_patch_is_bad_request() {
    let fixture = Fixture::new("");
    let response =
        exchange_text(fixture.site(), "PATCH / HTTP/1.1\r\nHost: 127.0.0.1:6789\r\n\r\n").await;

    assert_eq!(response, BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_requests_get_bad_request() {
    let fixture = Fixture::new("");
    let site = fixture.site();

    for request in [
        "GET /\r\nHost: 127.0.0.1:6789\r\n\r\n",
        "GET / HTTP/2.0\r\nHost: 127.0.0.1:6789\r\n\r\n",
        "GET / HTTP/1.1\r\n\r\n",
        "GET / HTTP/1.1\r\nHost: 127.0.0.1:6789\r\nHost: 127.0.0.1:6789\r\n\r\n",
        "GET / HTTP/1.1\r\nHost: 127.0.0.1:6789\r\nX-Forwarded-For: 1.2.3.4\r\n\r\n",
    ] {
        assert_eq!(exchange_text(site.clone(), request).await, BAD_REQUEST, "{request:?}");
    }
}

#[tokio::test]
async fn test_empty_request_is_bad_request() {
    let fixture = Fixture::new("");

    assert_eq!(exchange_text(fixture.site(), "").await, BAD_REQUEST);
}

#[tokio::test]
async fn test_stream_ending_before_blank_line_is_bad_request() {
    let fixture = Fixture::new("");
    let response =
        exchange_text(fixture.site(), "GET / HTTP/1.1\r\nHost: 127.0.0.1:6789\r\n").await;

    assert_eq!(response, BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_header_block_is_bad_request() {
    let mut fixture = Fixture::new("");
    fixture.cfg.server.max_header_bytes = 64;
    let site = fixture.site();

    let (mut client, server) = tokio::io::duplex(64 * 1024);
    let handle = tokio::spawn(Connection::new(server, peer(), site).run());

    // No blank line and no EOF: only the size limit ends the read
    let request = format!("GET / HTTP/1.1\r\nUser-Agent: {}\r\n", "a".repeat(200));
    client.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    handle.await.unwrap().unwrap();

    assert_eq!(String::from_utf8(response).unwrap(), BAD_REQUEST);
}

#[tokio::test]
async fn test_silent_client_times_out_without_response() {
    let mut fixture = Fixture::new("");
    fixture.cfg.server.header_timeout_secs = 1;
    let site = fixture.site();

    let (mut client, server) = tokio::io::duplex(1024);
    let handle = tokio::spawn(Connection::new(server, peer(), site).run());

    client.write_all(b"GET / HTTP/1.1\r\n").await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    handle.await.unwrap().unwrap();

    assert!(response.is_empty());
}

#[tokio::test]
async fn test_missing_template_yields_empty_body() {
    let mut fixture = Fixture::new("");
    fixture.cfg.templates.not_found = fixture.dir.path().join("errorfiles/absent.html");

    let response = exchange_text(
        fixture.site(),
        "GET /nothing.html HTTP/1.1\r\nHost: 127.0.0.1:6789\r\n\r\n",
    )
    .await;

    assert_eq!(response, "HTTP/1.1 404 Not Found\r\nContent-Type: text/html\r\n\r\n");
}

#[tokio::test]
async fn test_request_body_is_ignored() {
    let fixture = Fixture::new("");
    let response = exchange_text(
        fixture.site(),
        "POST / HTTP/1.1\r\nHost: 127.0.0.1:6789\r\nContent-Length: 5\r\n\r\nhello",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
}
