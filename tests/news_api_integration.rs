//! Integration tests for the news API client against a local server
#![cfg(feature = "fetch")]

use newsboard::news_api::NewsApiClient;
use newsboard::source::fetch_all;
use newsboard::{CategoryAggregator, Error, NewsApiConfig, DEFAULT_CATEGORIES};
use std::sync::Once;
use tiny_http::{Response, Server};

static INIT: Once = Once::new();

fn start_test_server() -> String {
    INIT.call_once(|| {
        std::thread::spawn(|| {
            let server = Server::http("127.0.0.1:18091").unwrap();
            for request in server.incoming_requests() {
                let url = request.url().to_string();
                let body = if url.contains("category=health") {
                    // health has no figure today
                    r#"{"status":"error","code":"unexpectedError","message":"Something went wrong."}"#.to_string()
                } else if url.contains("apiKey=secret") {
                    let total = if url.contains("category=business") { 42 } else { 100 };
                    format!(r#"{{"status":"ok","totalResults":{},"articles":[]}}"#, total)
                } else {
                    r#"{"status":"error","code":"apiKeyMissing","message":"Your API key is missing."}"#.to_string()
                };
                let resp = Response::from_string(body)
                    .with_header("Content-Type: application/json".parse::<tiny_http::Header>().unwrap());
                let _ = request.respond(resp);
            }
        });
        std::thread::sleep(std::time::Duration::from_millis(100));
    });

    "http://127.0.0.1:18091/v2/top-headlines".to_string()
}

fn client(api_key: &str) -> NewsApiClient {
    let config = NewsApiConfig {
        base_url: start_test_server(),
        api_key: api_key.to_string(),
        timeout_ms: 5000,
        ..Default::default()
    };
    NewsApiClient::new(config).expect("client")
}

#[test]
fn test_url_carries_query() {
    let url = client("secret").category_url("sports").unwrap();
    let query = url.query().unwrap();
    assert!(query.contains("country=us"));
    assert!(query.contains("category=sports"));
    assert!(query.contains("apiKey=secret"));
}

#[test]
fn test_fetch_single_category() {
    assert_eq!(client("secret").fetch_category("business").unwrap(), 42);
}

#[test]
fn test_missing_key_is_malformed() {
    match client("").fetch_category("science") {
        Err(Error::MalformedResponse { category, detail }) => {
            assert_eq!(category, "science");
            assert!(detail.contains("apiKeyMissing"));
        }
        other => panic!("expected MalformedResponse, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_failed_category_never_completes() {
    let client = client("secret");
    let categories: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
    let mut aggregator = CategoryAggregator::new(categories.len());

    let delivered = fetch_all(&client, &categories, |sample| {
        aggregator.record(sample);
    });

    assert_eq!(delivered, 6);
    assert_eq!(aggregator.snapshot().len(), 6);
    assert!(!aggregator.is_complete());
    assert_eq!(aggregator.snapshot().get("business"), Some(42));
    assert_eq!(aggregator.snapshot().get("health"), None);
}

#[test]
fn test_unreachable_host_is_network_error() {
    let config = NewsApiConfig {
        base_url: "http://127.0.0.1:1/v2/top-headlines".to_string(),
        timeout_ms: 1000,
        ..Default::default()
    };
    let client = NewsApiClient::new(config).unwrap();
    assert!(matches!(client.fetch_category("general"), Err(Error::NetworkError(_))));
}
