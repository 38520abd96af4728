//! Error types for polydash.

use chrono::NaiveDate;
use thiserror::Error;

use crate::Ticker;

/// Result type alias for polydash operations.
pub type Result<T> = std::result::Result<T, PolydashError>;

/// Top-level error for polydash operations.
#[derive(Error, Debug)]
pub enum PolydashError {
    /// Configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Fetching data for a ticker failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Invalid date window.
    #[error(transparent)]
    DateWindow(#[from] DateWindowError),

    /// Invalid ticker symbol.
    #[error(transparent)]
    Ticker(#[from] TickerError),

    /// No ticker produced any data.
    #[error("No data available for any requested ticker")]
    NoData,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fatal configuration errors. These are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The upstream API key is not configured.
    #[error("API key is not set (expected environment variable {var})")]
    MissingApiKey {
        /// Name of the environment variable that should hold the key.
        var: &'static str,
    },

    /// The configured base URL is not an absolute http(s) URL.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The ticker list is empty.
    #[error("No tickers configured")]
    NoTickers,

    /// A configured value could not be parsed.
    #[error("Invalid value for {name}: {value}")]
    InvalidValue {
        /// Setting name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Per-ticker fetch errors.
///
/// The orchestrator records these and moves on to the next ticker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The upstream returned a status outside the success range.
    #[error("Upstream returned HTTP {status} for {ticker}")]
    UpstreamHttp {
        /// Ticker being fetched.
        ticker: Ticker,
        /// HTTP status code.
        status: u16,
    },

    /// The response was well formed but carried no bars.
    #[error("No aggregate data available for {ticker} from {from} to {to}")]
    NoData {
        /// Ticker being fetched.
        ticker: Ticker,
        /// Window start (inclusive).
        from: NaiveDate,
        /// Window end (inclusive).
        to: NaiveDate,
    },

    /// The request never produced a response.
    #[error("Transport error for {ticker}: {message}")]
    Transport {
        /// Ticker being fetched.
        ticker: Ticker,
        /// Underlying error description.
        message: String,
    },

    /// The response body was not valid aggregates JSON.
    #[error("Failed to decode response for {ticker}: {message}")]
    Decode {
        /// Ticker being fetched.
        ticker: Ticker,
        /// Underlying error description.
        message: String,
    },

    /// A summary was requested from an empty series.
    #[error("Cannot derive a summary for {ticker} from an empty series")]
    EmptySeries {
        /// Ticker whose series was empty.
        ticker: Ticker,
    },
}

impl FetchError {
    /// Returns the ticker the error belongs to.
    #[must_use]
    pub const fn ticker(&self) -> &Ticker {
        match self {
            Self::UpstreamHttp { ticker, .. }
            | Self::NoData { ticker, .. }
            | Self::Transport { ticker, .. }
            | Self::Decode { ticker, .. }
            | Self::EmptySeries { ticker } => ticker,
        }
    }

    /// Returns true if repeating the request may succeed.
    ///
    /// Rate limiting (429), server errors (5xx) and transport failures are
    /// retryable. Everything else is a property of the request or the data.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::UpstreamHttp { status, .. } => *status == 429 || *status >= 500,
            Self::Transport { .. } => true,
            Self::NoData { .. } | Self::Decode { .. } | Self::EmptySeries { .. } => false,
        }
    }
}

/// Error for invalid date windows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateWindowError {
    /// Start date is after end date.
    #[error("Invalid date window: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },

    /// A date string was not `YYYY-MM-DD`.
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Error for invalid ticker symbols.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickerError {
    /// The symbol is empty after trimming.
    #[error("Ticker symbol is empty")]
    Empty,

    /// The symbol is longer than allowed.
    #[error("Ticker symbol '{0}' is too long")]
    TooLong(String),

    /// The symbol contains a character outside `[A-Z0-9.-]`.
    #[error("Ticker symbol '{symbol}' contains invalid character '{ch}'")]
    InvalidCharacter {
        /// The offending symbol.
        symbol: String,
        /// The first invalid character.
        ch: char,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tsla() -> Ticker {
        Ticker::new("TSLA").unwrap()
    }

    #[test]
    fn test_retryable_statuses() {
        let rate_limited = FetchError::UpstreamHttp {
            ticker: tsla(),
            status: 429,
        };
        let server = FetchError::UpstreamHttp {
            ticker: tsla(),
            status: 503,
        };
        let forbidden = FetchError::UpstreamHttp {
            ticker: tsla(),
            status: 403,
        };

        assert!(rate_limited.is_retryable());
        assert!(server.is_retryable());
        assert!(!forbidden.is_retryable());
    }

    #[test]
    fn test_no_data_message_names_window() {
        let error = FetchError::NoData {
            ticker: tsla(),
            from: NaiveDate::from_ymd_opt(2024, 9, 14).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 12, 13).unwrap(),
        };

        assert_eq!(
            error.to_string(),
            "No aggregate data available for TSLA from 2024-09-14 to 2024-12-13"
        );
        assert!(!error.is_retryable());
        assert_eq!(error.ticker().as_str(), "TSLA");
    }
}
