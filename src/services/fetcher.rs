//! Single-endpoint HTTP GET against the upstream API
//!
//! One attempt per call, no retries. Non-2xx answers become
//! `WarStatusError::Network`; everything else that goes wrong on the wire
//! (connect, timeout, body, JSON) becomes `WarStatusError::Transport`.

use crate::services::Config;
use crate::types::{Endpoint, Result, WarStatusError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use serde_json::Value;

const CLIENT_HEADER: &str = "x-super-client";
const CONTACT_HEADER: &str = "x-super-contact";

/// Fetches the raw JSON payload of one endpoint
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, endpoint: Endpoint) -> Result<Value>;
}

/// reqwest-backed fetcher with fixed identification headers
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(CLIENT_HEADER),
            header_value(&config.client_name)?,
        );
        headers.insert(
            HeaderName::from_static(CONTACT_HEADER),
            header_value(&config.contact)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| WarStatusError::Transport(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, endpoint: Endpoint) -> Result<Value> {
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| WarStatusError::Transport(format!("{} request failed: {}", endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WarStatusError::Network {
                endpoint: endpoint.path().to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| WarStatusError::Transport(format!("{} body read failed: {}", endpoint, e)))?;

        parse_body(endpoint, &body)
    }
}

/// Parse a response body as JSON (SIMD accelerated)
pub fn parse_body(endpoint: Endpoint, body: &[u8]) -> Result<Value> {
    let mut buf = body.to_vec();
    simd_json::from_slice::<Value>(&mut buf)
        .map_err(|e| WarStatusError::Transport(format!("{} JSON parse error: {}", endpoint, e)))
}

fn header_value(raw: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(raw)
        .map_err(|e| WarStatusError::Config(format!("Invalid header value '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve one canned HTTP response; the raw request text is sent back on the channel.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
        });

        (format!("http://{}/api", addr), rx)
    }

    fn fetcher_for(base_url: String) -> HttpFetcher {
        let config = Config {
            base_url,
            client_name: "test-client".into(),
            contact: "ops@example.com".into(),
            request_timeout_secs: 2,
            ..Config::default()
        };
        HttpFetcher::new(&config).unwrap()
    }

    // ========== Success path ==========

    #[tokio::test]
    async fn test_fetch_parses_json_and_sends_headers() {
        let (base, request_rx) = serve_once("200 OK", r#"{"statistics":{"missionsWon":7}}"#).await;
        let fetcher = fetcher_for(base);

        let value = fetcher.fetch(Endpoint::War).await.unwrap();
        assert_eq!(value["statistics"]["missionsWon"], 7);

        let request = request_rx.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /api/v1/war "), "{}", request);
        assert!(request.contains("x-super-client: test-client"));
        assert!(request.contains("x-super-contact: ops@example.com"));
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let fetcher = fetcher_for("https://example.com/api/".into());
        assert_eq!(
            fetcher.url(Endpoint::SpaceStations),
            "https://example.com/api/v1/space-stations"
        );
    }

    // ========== Failure classification ==========

    #[tokio::test]
    async fn test_non_2xx_is_network_error_with_status() {
        let (base, _rx) = serve_once("503 Service Unavailable", "{}").await;
        let fetcher = fetcher_for(base);

        let err = fetcher.fetch(Endpoint::Planets).await.unwrap_err();
        assert!(matches!(err, WarStatusError::Network { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_rate_limited_status_is_network_error() {
        let (base, _rx) = serve_once("429 Too Many Requests", "").await;
        let fetcher = fetcher_for(base);

        let err = fetcher.fetch(Endpoint::Dispatches).await.unwrap_err();
        assert_eq!(err.status(), Some(429));
    }

    #[tokio::test]
    async fn test_malformed_json_is_transport_error() {
        let (base, _rx) = serve_once("200 OK", "not json{{").await;
        let fetcher = fetcher_for(base);

        let err = fetcher.fetch(Endpoint::SteamNews).await.unwrap_err();
        assert!(matches!(err, WarStatusError::Transport(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = fetcher_for(format!("http://{}/api", addr));
        let err = fetcher.fetch(Endpoint::War).await.unwrap_err();
        assert!(matches!(err, WarStatusError::Transport(_)));
    }

    #[tokio::test]
    async fn test_hung_endpoint_times_out_as_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let config = Config {
            base_url: format!("http://{}/api", addr),
            request_timeout_secs: 1,
            ..Config::default()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();

        let err = fetcher.fetch(Endpoint::Campaigns).await.unwrap_err();
        assert!(matches!(err, WarStatusError::Transport(_)));
    }

    // ========== Construction ==========

    #[test]
    fn test_invalid_header_value_is_config_error() {
        let config = Config {
            client_name: "bad\nvalue".into(),
            ..Config::default()
        };
        assert!(matches!(
            HttpFetcher::new(&config),
            Err(WarStatusError::Config(_))
        ));
    }

    #[test]
    fn test_parse_body_empty_is_error() {
        assert!(parse_body(Endpoint::War, b"").is_err());
    }
}
