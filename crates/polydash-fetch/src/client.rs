//! Market data client for the historical aggregates endpoint.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use polydash_types::{
    ConfigError, DailyBar, DateWindow, FetchError, Ticker, TickerResult, TickerSeries,
    TickerSummary, Timespan,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::parse::parse_aggregates;
use crate::timer::{Timer, TokioTimer};
use crate::transport::{ReqwestTransport, Transport};
use crate::url::{BASE_URL, aggregates_url, redact_api_key};

/// Environment variable that holds the upstream API key.
pub const API_KEY_ENV: &str = "POLYDASH_API_KEY";

/// Configuration for the market data client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Upstream API key, sent as the `apiKey` query parameter.
    pub api_key: String,
    /// API base URL without a trailing path.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts for retryable failures.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// User agent string.
    pub user_agent: String,
    /// Number of timespans per bar.
    pub multiplier: u32,
    /// Bar size.
    pub timespan: Timespan,
    /// Date window requested for every ticker.
    pub window: DateWindow,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 1,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
            user_agent: format!("polydash/{}", env!("CARGO_PKG_VERSION")),
            multiplier: 1,
            timespan: Timespan::Day,
            window: DateWindow::reference(),
        }
    }
}

impl ClientConfig {
    /// Creates a default configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the date window.
    #[must_use]
    pub const fn with_window(mut self, window: DateWindow) -> Self {
        self.window = window;
        self
    }

    /// Sets the retry budget.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Checks that the configuration can issue requests.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] for a blank key,
    /// [`ConfigError::InvalidBaseUrl`] for a non-http(s) base URL and
    /// [`ConfigError::InvalidValue`] for a zero multiplier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey { var: API_KEY_ENV });
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.multiplier == 0 {
            return Err(ConfigError::InvalidValue {
                name: "multiplier",
                value: self.multiplier.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("base_delay_ms", &self.base_delay_ms)
            .field("max_delay_ms", &self.max_delay_ms)
            .field("user_agent", &self.user_agent)
            .field("multiplier", &self.multiplier)
            .field("timespan", &self.timespan)
            .field("window", &self.window)
            .finish()
    }
}

/// Errors constructing a [`MarketDataClient`].
#[derive(Error, Debug)]
pub enum ClientError {
    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Produces the fetched data for one ticker.
#[async_trait]
pub trait TickerSource: Send + Sync {
    /// Fetches the series for `ticker` and derives its summary.
    async fn fetch_ticker(&self, ticker: &Ticker) -> Result<TickerResult, FetchError>;
}

/// Client for the historical aggregates endpoint with retry logic.
#[derive(Debug, Clone)]
pub struct MarketDataClient {
    transport: Arc<dyn Transport>,
    timer: Arc<dyn Timer>,
    config: ClientConfig,
}

impl MarketDataClient {
    /// Creates a client that talks to the network.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout, &config.user_agent)?;
        Ok(Self {
            transport: Arc::new(transport),
            timer: Arc::new(TokioTimer),
            config,
        })
    }

    /// Creates a client over an existing transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            transport,
            timer: Arc::new(TokioTimer),
            config,
        })
    }

    /// Replaces the timer used for retry backoff.
    #[must_use]
    pub fn with_timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = timer;
        self
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches the bars for one ticker over `window`.
    ///
    /// Rate limiting, server errors and transport failures are retried up to
    /// `max_retries` times with exponential backoff. Bars are returned in
    /// upstream order.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::UpstreamHttp`] for non-2xx statuses,
    /// [`FetchError::NoData`] when the response carries no bars,
    /// [`FetchError::Decode`] for malformed bodies and
    /// [`FetchError::Transport`] when no response was received.
    pub async fn fetch_series(
        &self,
        ticker: &Ticker,
        window: &DateWindow,
    ) -> Result<TickerSeries, FetchError> {
        let url = aggregates_url(
            &self.config.base_url,
            ticker,
            self.config.multiplier,
            self.config.timespan,
            window,
            &self.config.api_key,
        );
        debug!(ticker = %ticker, url = %redact_api_key(&url), "Requesting aggregates");

        let mut attempts = 0;
        loop {
            match self.request(ticker, window, &url).await {
                Err(e) if e.is_retryable() && attempts < self.config.max_retries => {
                    attempts += 1;
                    let delay = self.calculate_backoff_delay(attempts);
                    warn!(
                        ticker = %ticker,
                        attempt = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying request"
                    );
                    self.timer.sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    /// Fetches the configured window for `ticker` and derives its summary.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Self::fetch_series`].
    pub async fn fetch_ticker_result(&self, ticker: &Ticker) -> Result<TickerResult, FetchError> {
        let series = self.fetch_series(ticker, &self.config.window).await?;
        let summary = derive_summary(ticker, &series)?;
        debug!(ticker = %ticker, bars = series.len(), "Fetched series");
        Ok(TickerResult {
            ticker: ticker.clone(),
            summary,
            series,
        })
    }

    async fn request(
        &self,
        ticker: &Ticker,
        window: &DateWindow,
        url: &str,
    ) -> Result<TickerSeries, FetchError> {
        let response = self
            .transport
            .get(url)
            .await
            .map_err(|e| FetchError::Transport {
                ticker: ticker.clone(),
                message: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(FetchError::UpstreamHttp {
                ticker: ticker.clone(),
                status: response.status,
            });
        }

        parse_aggregates(ticker, window, &response.body)
    }

    /// Calculates the backoff delay with exponential backoff and jitter.
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        let exp_delay = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(10));
        let capped_delay = exp_delay.min(self.config.max_delay_ms);

        // Deterministic jitter in [-25%, +25%)
        let jitter_range = capped_delay / 4;
        let jitter = if jitter_range > 0 {
            (u64::from(attempt) * 17 % (jitter_range * 2)) as i64 - jitter_range as i64
        } else {
            0
        };

        let final_delay = (capped_delay as i64 + jitter).max(self.config.base_delay_ms as i64);
        Duration::from_millis(final_delay as u64)
    }
}

#[async_trait]
impl TickerSource for MarketDataClient {
    async fn fetch_ticker(&self, ticker: &Ticker) -> Result<TickerResult, FetchError> {
        self.fetch_ticker_result(ticker).await
    }
}

/// Builds the summary for a ticker from the last bar of its series.
///
/// # Errors
///
/// Returns [`FetchError::EmptySeries`] if `series` is empty.
pub fn derive_summary(ticker: &Ticker, series: &[DailyBar]) -> Result<TickerSummary, FetchError> {
    series
        .last()
        .map(|bar| TickerSummary::from_bar(ticker.clone(), bar))
        .ok_or_else(|| FetchError::EmptySeries {
            ticker: ticker.clone(),
        })
}
