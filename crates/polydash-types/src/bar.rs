//! Daily bars and the summaries derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Ticker;

/// One trading-period observation (OHLCV plus VWAP).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Opening price.
    pub open: f64,
    /// Highest price during the period.
    pub high: f64,
    /// Lowest price during the period.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Volume-weighted average price.
    pub vwap: f64,
    /// Number of shares traded.
    pub volume: u64,
    /// Period start as epoch milliseconds (UTC).
    pub timestamp: i64,
    /// Number of transactions, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<u64>,
}

impl DailyBar {
    /// Creates a new bar without a transaction count.
    #[must_use]
    pub const fn new(
        timestamp: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        vwap: f64,
        volume: u64,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            vwap,
            volume,
            timestamp,
            transactions: None,
        }
    }

    /// Sets the transaction count.
    #[must_use]
    pub const fn with_transactions(mut self, transactions: u64) -> Self {
        self.transactions = Some(transactions);
        self
    }

    /// Returns the period start as a UTC datetime, if the timestamp is in range.
    #[must_use]
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Ordered bars for one ticker, ascending by timestamp.
pub type TickerSeries = Vec<DailyBar>;

/// The "previous day" view of a ticker, taken from its most recent bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSummary {
    /// Ticker symbol.
    pub ticker: Ticker,
    /// Closing price.
    pub close: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Opening price.
    pub open: f64,
    /// Volume-weighted average price.
    pub vwap: f64,
    /// Number of shares traded.
    pub volume: u64,
    /// Bar timestamp as epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Number of transactions, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<u64>,
}

impl TickerSummary {
    /// Builds a summary from a single bar. Prices are copied unchanged.
    #[must_use]
    pub fn from_bar(ticker: Ticker, bar: &DailyBar) -> Self {
        Self {
            ticker,
            close: bar.close,
            high: bar.high,
            low: bar.low,
            open: bar.open,
            vwap: bar.vwap,
            volume: bar.volume,
            timestamp: Some(bar.timestamp),
            transactions: bar.transactions,
        }
    }

    /// Returns the absolute move from open to close.
    #[must_use]
    pub fn change(&self) -> f64 {
        self.close - self.open
    }

    /// Returns true if the ticker closed at or above its open.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.change() >= 0.0
    }

    /// Returns the volume in millions of shares.
    #[must_use]
    pub fn volume_millions(&self) -> f64 {
        self.volume as f64 / 1_000_000.0
    }
}

/// Everything fetched for one ticker: its summary and full series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerResult {
    /// Ticker symbol.
    pub ticker: Ticker,
    /// Summary derived from the last bar of `series`.
    pub summary: TickerSummary,
    /// Historical bars in upstream order.
    pub series: TickerSeries,
}

impl TickerResult {
    /// Returns the series as a slice.
    #[must_use]
    pub fn bars(&self) -> &[DailyBar] {
        &self.series
    }
}
