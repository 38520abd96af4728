//! Snapshot records and their keys.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use polydash_types::{DateWindow, Ticker, TickerResult};
use serde::{Deserialize, Serialize};

/// How long a snapshot is reused before a refetch.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(10 * 60);

/// Identity of a snapshot: the upstream source, the ordered ticker list and
/// the window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds the key for a source, ticker list and window.
    ///
    /// Ticker order is part of the key since it fixes output order. Symbols
    /// are joined with `+`, which a ticker never contains.
    #[must_use]
    pub fn new(source: &str, tickers: &[Ticker], window: &DateWindow) -> Self {
        let symbols: Vec<&str> = tickers.iter().map(Ticker::as_str).collect();
        Self(format!(
            "{}_{}_{}_{}",
            symbols.join("+"),
            window.start.format("%Y%m%d"),
            window.end.format("%Y%m%d"),
            source_tag(source)
        ))
    }

    /// Returns the key as a string, usable as a file stem.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reduces a base URL to a file-name-safe tag: `https://api.polygon.io/`
/// becomes `api.polygon.io`.
fn source_tag(source: &str) -> String {
    let host = source
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    host.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect()
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored fetch result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot identity.
    pub key: CacheKey,
    /// When the fetch completed.
    pub saved_at: DateTime<Utc>,
    /// Upstream base URL the results came from.
    #[serde(default)]
    pub source: String,
    /// Requested tickers, in order.
    pub tickers: Vec<Ticker>,
    /// Requested window.
    pub window: DateWindow,
    /// Successful results, in request order.
    pub results: Vec<TickerResult>,
    /// Tickers that failed during the fetch.
    #[serde(default)]
    pub failed: Vec<Ticker>,
}

impl Snapshot {
    /// Creates a snapshot stamped with the current time.
    #[must_use]
    pub fn new(
        source: &str,
        tickers: Vec<Ticker>,
        window: DateWindow,
        results: Vec<TickerResult>,
        failed: Vec<Ticker>,
    ) -> Self {
        Self::at(Utc::now(), source, tickers, window, results, failed)
    }

    /// Creates a snapshot stamped with `saved_at`.
    #[must_use]
    pub fn at(
        saved_at: DateTime<Utc>,
        source: &str,
        tickers: Vec<Ticker>,
        window: DateWindow,
        results: Vec<TickerResult>,
        failed: Vec<Ticker>,
    ) -> Self {
        Self {
            key: CacheKey::new(source, &tickers, &window),
            saved_at,
            source: source.to_string(),
            tickers,
            window,
            results,
            failed,
        }
    }

    /// Returns true if the snapshot answers exactly this request.
    #[must_use]
    pub fn matches(&self, source: &str, tickers: &[Ticker], window: &DateWindow) -> bool {
        self.source == source && self.tickers.as_slice() == tickers && self.window == *window
    }

    /// Returns the snapshot age at `now`, or `None` if it is dated in the
    /// future.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Option<Duration> {
        (now - self.saved_at).to_std().ok()
    }

    /// Returns true if the snapshot is no older than `max_age` at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        self.age(now).is_some_and(|age| age <= max_age)
    }
}
