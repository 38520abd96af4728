//! HTTP transport abstraction.
//!
//! [`MarketDataClient`](crate::MarketDataClient) talks to the network through
//! the [`Transport`] trait so that it can run against an in-memory transport
//! in tests. `MockTransport` is available under `cfg(test)` or with the
//! `test-util` feature.

#[cfg(any(test, feature = "test-util"))]
use std::collections::{HashMap, VecDeque};
#[cfg(any(test, feature = "test-util"))]
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

/// Status code and body of a completed HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Creates a `200 OK` response.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// A request that did not produce an HTTP response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other request failure.
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();
        if error.is_timeout() {
            Self::Timeout(message)
        } else if error.is_connect() {
            Self::Connect(message)
        } else if error.is_body() || error.is_decode() {
            Self::Body(message)
        } else {
            Self::Request(message)
        }
    }
}

/// Issues GET requests.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Performs a GET request and returns the status and body.
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// Transport backed by a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with the given request timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(any(test, feature = "test-util"))]
type Reply = Result<HttpResponse, TransportError>;

#[cfg(any(test, feature = "test-util"))]
/// In-memory transport for offline runs and tests.
///
/// Replies are queued per ticker symbol, matched against the
/// `/ticker/{SYMBOL}/` path segment of the request URL. The last queued reply
/// for a ticker repeats once the queue is drained. Requests for tickers with
/// no replies get a 404. Every requested URL is recorded.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "test-util"))]
impl MockTransport {
    /// Creates a transport with no replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for a ticker.
    #[must_use]
    pub fn with_response(self, ticker: &str, status: u16, body: impl Into<String>) -> Self {
        self.push(ticker, Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queues a transport failure for a ticker.
    #[must_use]
    pub fn with_error(self, ticker: &str, error: TransportError) -> Self {
        self.push(ticker, Err(error));
        self
    }

    /// Returns every URL requested so far, in request order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of requests issued for a ticker.
    #[must_use]
    pub fn request_count(&self, ticker: &str) -> usize {
        self.requests()
            .iter()
            .filter(|url| ticker_segment(url).is_some_and(|t| t.eq_ignore_ascii_case(ticker)))
            .count()
    }

    fn push(&self, ticker: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(ticker.to_ascii_uppercase())
            .or_default()
            .push_back(reply);
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        let Some(ticker) = ticker_segment(url) else {
            return Ok(HttpResponse::new(404, "{}"));
        };

        let mut replies = self.replies.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(queue) = replies.get_mut(&ticker.to_ascii_uppercase()) else {
            return Ok(HttpResponse::new(404, "{}"));
        };

        if queue.len() > 1 {
            queue.pop_front().unwrap_or_else(|| Ok(HttpResponse::new(404, "{}")))
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(HttpResponse::new(404, "{}")))
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
fn ticker_segment(url: &str) -> Option<&str> {
    let rest = url.split_once("/ticker/")?.1;
    rest.split(['/', '?']).next().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_success_range() {
        assert!(HttpResponse::ok("{}").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
        assert!(!HttpResponse::new(429, "").is_success());
    }

    #[test]
    fn test_ticker_segment() {
        assert_eq!(
            ticker_segment("https://h/v2/aggs/ticker/TSLA/range/1/day/a/b?x=1"),
            Some("TSLA")
        );
        assert_eq!(ticker_segment("https://h/v2/other"), None);
    }

    #[tokio::test]
    async fn test_mock_transport_replays_queue_then_repeats_last() {
        let transport = MockTransport::new()
            .with_response("TSLA", 500, "boom")
            .with_response("TSLA", 200, "ok");
        let url = "https://h/v2/aggs/ticker/TSLA/range/1/day/a/b";

        assert_eq!(transport.get(url).await.unwrap().status, 500);
        assert_eq!(transport.get(url).await.unwrap().status, 200);
        assert_eq!(transport.get(url).await.unwrap().status, 200);
        assert_eq!(transport.request_count("tsla"), 3);
    }

    #[tokio::test]
    async fn test_mock_transport_unknown_ticker_is_404() {
        let transport = MockTransport::new();
        let response = transport
            .get("https://h/v2/aggs/ticker/IBM/range/1/day/a/b")
            .await
            .unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_mock_transport_error_reply() {
        let transport =
            MockTransport::new().with_error("AAPL", TransportError::Connect("refused".into()));
        let err = transport
            .get("https://h/v2/aggs/ticker/AAPL/range/1/day/a/b")
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::Connect("refused".into()));
    }
}
