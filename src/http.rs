//! Thin HTTP wrapper shared by the extractors
//!
//! Every call is a single GET bounded by the client timeout. Failures come
//! back as [`ExtractError`] values; nothing is retried.

use crate::error::{Error, ExtractError, Result};
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// User agent for requests (standard Chrome on Windows)
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum redirects followed per request
const MAX_REDIRECTS: usize = 10;

/// HTTP client with a fixed per-request timeout
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Build a client whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(false)
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }

    /// GET `url` and return the body as text
    pub async fn get_text(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: HeaderMap,
    ) -> std::result::Result<String, ExtractError> {
        debug!(url, "Sending request.");

        let response = self
            .client
            .get(url)
            .query(query)
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                let err = ExtractError::from(e);
                warn!(url, error = %err, "Request failed.");
                err
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Non-success response.");
            return Err(ExtractError::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| {
            let err = ExtractError::from(e);
            warn!(url, error = %err, "Failed to read response body.");
            err
        })
    }

    /// GET `url` and decode the body as JSON
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: HeaderMap,
    ) -> std::result::Result<T, ExtractError> {
        let body = self.get_text(url, query, headers).await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(url, error = %e, "Response was not valid JSON.");
            ExtractError::Decode(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(timeout: Duration) -> HttpClient {
        HttpClient::new(timeout).unwrap()
    }

    #[tokio::test]
    async fn returns_body_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(query_param("q", "https://client.com"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let body = client(Duration::from_secs(5))
            .get_text(
                &format!("{}/page", server.uri()),
                &[("q", "https://client.com")],
                HeaderMap::new(),
            )
            .await;
        assert_eq!(body.unwrap(), "hello");
    }

    #[tokio::test]
    async fn sends_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Token token=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Token token=abc".parse().unwrap());
        let value: serde_json::Value = client(Duration::from_secs(5))
            .get_json(&server.uri(), &[], headers)
            .await
            .unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = client(Duration::from_secs(5))
            .get_text(&server.uri(), &[], HeaderMap::new())
            .await;
        assert_eq!(result.unwrap_err(), ExtractError::Status(503));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let result = client(Duration::from_millis(100))
            .get_text(&server.uri(), &[], HeaderMap::new())
            .await;
        assert_eq!(result.unwrap_err(), ExtractError::Timeout);
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        // Bind then drop a listener so the port is closed
        let uri = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}", listener.local_addr().unwrap())
        };

        let result = client(Duration::from_secs(5))
            .get_text(&uri, &[], HeaderMap::new())
            .await;
        assert!(matches!(result, Err(ExtractError::Transport(_))));
    }

    #[tokio::test]
    async fn invalid_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result: std::result::Result<serde_json::Value, _> = client(Duration::from_secs(5))
            .get_json(&server.uri(), &[], HeaderMap::new())
            .await;
        assert!(matches!(result, Err(ExtractError::Decode(_))));
    }
}
