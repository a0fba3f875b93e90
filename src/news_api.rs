//! HTTP data source for the news API.
//!
//! Performs one blocking `GET` per category against the top-headlines
//! endpoint and extracts `totalResults` from the JSON body. The articles
//! themselves are ignored.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::source::CategorySource;
use crate::{Error, NewsApiConfig, Result};

/// The subset of the top-headlines response we read.
#[derive(Debug, Deserialize)]
struct TopHeadlines {
    status: Option<String>,
    #[serde(rename = "totalResults")]
    total_results: Option<u64>,
    code: Option<String>,
    message: Option<String>,
}

/// Blocking client for the news API
pub struct NewsApiClient {
    client: Client,
    config: NewsApiConfig,
}

impl NewsApiClient {
    pub fn new(config: NewsApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::NetworkError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Request URL for `category`.
    pub fn category_url(&self, category: &str) -> Result<url::Url> {
        url::Url::parse_with_params(
            &self.config.base_url,
            &[
                ("country", self.config.country.as_str()),
                ("category", category),
                ("apiKey", self.config.api_key.as_str()),
            ],
        )
        .map_err(|e| Error::ConfigError(format!("Invalid news API url '{}': {}", self.config.base_url, e)))
    }

    /// Fetch the number of headlines currently listed for `category`.
    pub fn fetch_category(&self, category: &str) -> Result<u64> {
        let url = self.category_url(category)?;
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::NetworkError(format!("GET for '{}' failed: {}", category, e)))?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| Error::NetworkError(format!("Failed to read response body: {}", e)))?;

        parse_total_results(category, &body).map_err(|e| {
            log::debug!("'{}' answered HTTP {}: {}", category, status, body);
            e
        })
    }
}

impl CategorySource for NewsApiClient {
    fn fetch(&self, category: &str) -> Result<u64> {
        self.fetch_category(category)
    }
}

fn parse_total_results(category: &str, body: &str) -> Result<u64> {
    let parsed: TopHeadlines = serde_json::from_str(body).map_err(|e| Error::MalformedResponse {
        category: category.to_string(),
        detail: format!("invalid JSON: {}", e),
    })?;

    match parsed.total_results {
        Some(total) => Ok(total),
        None => {
            let detail = match (parsed.status, parsed.code, parsed.message) {
                (_, Some(code), Some(message)) => format!("{}: {}", code, message),
                (_, _, Some(message)) => message,
                (Some(status), _, _) => format!("totalResults is not defined (status {})", status),
                _ => "totalResults is not defined".to_string(),
            };
            Err(Error::MalformedResponse {
                category: category.to_string(),
                detail,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_total_results() {
        let body = r#"{"status":"ok","totalResults":38,"articles":[]}"#;
        assert_eq!(parse_total_results("business", body).unwrap(), 38);
    }

    #[test]
    fn api_error_body_is_malformed() {
        let body = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#;
        match parse_total_results("sports", body) {
            Err(Error::MalformedResponse { category, detail }) => {
                assert_eq!(category, "sports");
                assert!(detail.contains("apiKeyInvalid"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn url_carries_query_parameters() {
        let client = NewsApiClient::new(NewsApiConfig {
            api_key: "k3y".into(),
            ..Default::default()
        })
        .unwrap();
        let url = client.category_url("health").unwrap();
        assert_eq!(url.host_str(), Some("newsapi.org"));
        assert_eq!(url.query(), Some("country=us&category=health&apiKey=k3y"));
    }
}
