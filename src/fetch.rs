//! Page fetching for content detail URLs

use crate::config::FetchConfig;
use crate::error::{Result, StageError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Source of raw page HTML
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the HTML body of `url`; non-success statuses are errors
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// reqwest-backed fetcher with a fixed browser User-Agent and timeout
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher from fetch settings
    pub fn new(config: &FetchConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, timeout }
    }

    /// Report a lapsed deadline as a timeout, anything else as transport failure
    fn transport_error(&self, url: &str, e: reqwest::Error) -> StageError {
        if e.is_timeout() {
            StageError::Timeout {
                url: url.to_string(),
                seconds: self.timeout.as_secs(),
            }
        } else {
            StageError::Http(e)
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        info!("🌐 Fetching page: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StageError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(url, e))?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn fetcher(timeout_seconds: u64) -> HttpFetcher {
        HttpFetcher::new(&FetchConfig {
            timeout_seconds,
            ..FetchConfig::default()
        })
    }

    /// Serve one connection with `head` and `body`, then hold the socket open
    async fn stalling_server(head: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body.as_bytes()).await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });
        format!("http://{}/en/haryanvi/movie/kayantar-14145", addr)
    }

    #[tokio::test]
    async fn test_stalled_body_is_a_timeout() {
        let url = stalling_server(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 4096\r\n\r\n",
            "<html><head><title>Kayantar",
        )
        .await;

        match fetcher(1).fetch(&url).await {
            Err(StageError::Timeout { url: failed, seconds }) => {
                assert_eq!(failed, url);
                assert_eq!(seconds, 1);
            }
            other => panic!("expected timeout, got {:?}", other.map(|b| b.len())),
        }
    }

    #[tokio::test]
    async fn test_complete_body_is_returned() {
        let url = stalling_server(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 14\r\n\r\n",
            "<h1>Sahab</h1>",
        )
        .await;

        let body = fetcher(5).fetch(&url).await.unwrap();
        assert_eq!(body, "<h1>Sahab</h1>");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let url = stalling_server(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n",
            "",
        )
        .await;

        match fetcher(5).fetch(&url).await {
            Err(StageError::Status { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected status error, got {:?}", other.map(|b| b.len())),
        }
    }
}
