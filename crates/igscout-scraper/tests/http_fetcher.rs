//! Integration tests for `HttpFetcher` against a local `wiremock` server.

use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use igscout_scraper::{FailureKind, HttpFetcher, PageFetcher, ScraperError};

fn test_fetcher(timeout_secs: u64) -> HttpFetcher {
    HttpFetcher::new(timeout_secs, "igscout-test/0.1", None).expect("failed to build test fetcher")
}

#[tokio::test]
async fn returns_body_of_successful_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jane/"))
        .and(header("user-agent", "igscout-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>jane</html>"))
        .mount(&server)
        .await;

    let body = test_fetcher(5)
        .fetch_page(&format!("{}/jane/", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "<html>jane</html>");
}

#[tokio::test]
async fn non_success_status_is_a_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_fetcher(5)
        .fetch_page(&format!("{}/gone/", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::HttpStatus { status: 404, .. }),
        "got: {err:?}"
    );
    assert_eq!(err.kind(), FailureKind::Fetch);
}

#[tokio::test]
async fn rate_limited_response_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/busy/"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_fetcher(5)
        .fetch_page(&format!("{}/busy/", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::HttpStatus { status: 429, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let err = test_fetcher(1)
        .fetch_page(&format!("{}/slow/", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::Timeout { .. }), "got: {err:?}");
    assert_eq!(err.kind(), FailureKind::Fetch);
}
