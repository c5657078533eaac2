//! HTTP fetcher behavior against a mock server

use crate::support::{serve_list, serve_status};
use blockmerge::config::FetchConfig;
use blockmerge::fetcher::{Fetch, FetchResult, HttpFetcher};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpFetcher {
    let config = FetchConfig {
        timeout_secs: 1,
        user_agent: "blockmerge-test/1.0".to_string(),
        ..FetchConfig::default()
    };
    HttpFetcher::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_plain_list_is_fetched() {
    let server = MockServer::start().await;
    serve_list(&server, "/hosts.txt", "0.0.0.0 ads.test\n").await;

    let result = fetcher()
        .fetch(&format!("{}/hosts.txt", server.uri()))
        .await;

    assert_eq!(
        result,
        FetchResult::Success {
            status_code: 200,
            body: b"0.0.0.0 ads.test\n".to_vec(),
        }
    );
}

#[tokio::test]
async fn test_body_bytes_are_not_decoded() {
    let server = MockServer::start().await;
    let raw = b"\xEF\xBB\xBF0.0.0.0 ads.test\n".to_vec();
    Mock::given(method("GET"))
        .and(path("/bom.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(raw.clone()))
        .mount(&server)
        .await;

    let result = fetcher().fetch(&format!("{}/bom.txt", server.uri())).await;
    assert_eq!(
        result,
        FetchResult::Success {
            status_code: 200,
            body: raw,
        }
    );
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua.txt"))
        .and(header("user-agent", "blockmerge-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ads.test\n"))
        .mount(&server)
        .await;

    let result = fetcher().fetch(&format!("{}/ua.txt", server.uri())).await;
    assert!(result.is_success());
}

#[tokio::test]
async fn test_not_found_is_rejected() {
    let server = MockServer::start().await;
    serve_status(&server, "/gone.txt", 404).await;

    let result = fetcher().fetch(&format!("{}/gone.txt", server.uri())).await;
    assert!(matches!(
        result,
        FetchResult::ContentRejected {
            status_code: 404,
            ..
        }
    ));
}

#[tokio::test]
async fn test_html_page_is_rejected() {
    let server = MockServer::start().await;
    serve_list(
        &server,
        "/parked.txt",
        "<!DOCTYPE html>\n<HTML><body>This domain is for sale</body></HTML>",
    )
    .await;

    let result = fetcher()
        .fetch(&format!("{}/parked.txt", server.uri()))
        .await;
    assert!(matches!(
        result,
        FetchResult::ContentRejected {
            status_code: 200,
            ..
        }
    ));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("ads.test\n")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let result = fetcher().fetch(&format!("{}/slow.txt", server.uri())).await;
    assert!(matches!(result, FetchResult::NetworkError { .. }));
}
