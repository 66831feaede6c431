//! HTTP retrieval of remote trip and zone files.

mod basic;

pub use basic::BasicClient;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Request, Response};
use tracing::debug;

/// Transport used by [`fetch_bytes`]; swap in a custom client for proxies or tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Issues a GET for `url` and returns the body. Non-success statuses are errors.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes> {
    let req = Request::new(
        reqwest::Method::GET,
        url.parse().with_context(|| format!("Invalid URL: {url}"))?,
    );

    let resp = client.execute(req).await?.error_for_status()?;
    debug!(status = %resp.status(), "HTTP response received");
    Ok(resp.bytes().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records the request and fails it without touching the network.
    struct RecordingClient {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HttpClient for RecordingClient {
        async fn execute(&self, req: Request) -> reqwest::Result<Response> {
            self.seen.lock().unwrap().push(req.url().to_string());
            // an unroutable scheme makes reqwest return an error immediately
            reqwest::Client::new()
                .execute(Request::new(reqwest::Method::GET, "unsupported://x".parse().unwrap()))
                .await
        }
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_invalid_url() {
        let client = RecordingClient { seen: Mutex::new(Vec::new()) };

        let err = fetch_bytes(&client, "not a url").await.unwrap_err();

        assert!(err.to_string().contains("Invalid URL"));
        assert!(client.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_bytes_issues_get_through_client() {
        let client = RecordingClient { seen: Mutex::new(Vec::new()) };

        let result = fetch_bytes(&client, "https://example.com/taxi_zone_lookup.csv").await;

        assert!(result.is_err());
        assert_eq!(
            client.seen.lock().unwrap().as_slice(),
            ["https://example.com/taxi_zone_lookup.csv"]
        );
    }
}
