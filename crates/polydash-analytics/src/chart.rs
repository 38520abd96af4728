//! Aligned multi-ticker chart series.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use polydash_types::{DailyBar, Ticker, TickerResult};
use serde::{Deserialize, Serialize};

/// How chart values are derived from closing prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    /// Closing prices as reported.
    #[default]
    Raw,
    /// Closing prices rebased to 100 at each ticker's first observation.
    Indexed,
}

impl ChartMode {
    /// Returns the mode name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Indexed => "indexed",
        }
    }
}

impl fmt::Display for ChartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" | "price" => Ok(Self::Raw),
            "indexed" | "index" | "rebased" => Ok(Self::Indexed),
            _ => Err(format!("invalid chart mode '{s}', expected raw or indexed")),
        }
    }
}

/// One point on the shared timeline.
///
/// Serializes flat: `{"date": 1000, "TSLA": 220.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Timestamp in epoch milliseconds.
    pub date: i64,
    /// Value per ticker symbol. Tickers without a bar at `date` are absent.
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl ChartPoint {
    /// Returns the value for a ticker at this point.
    #[must_use]
    pub fn value(&self, ticker: &str) -> Option<f64> {
        self.values.get(ticker).copied()
    }

    /// Returns the timestamp as a UTC datetime.
    #[must_use]
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.date)
    }
}

/// Builds one aligned series from per-ticker bars.
///
/// The timeline is the ascending, de-duplicated union of every input
/// timestamp. A ticker contributes a value only at timestamps where it has a
/// bar; gaps are not filled. Within a ticker, bars are sorted by timestamp
/// and the first bar wins on a duplicate timestamp.
///
/// In [`ChartMode::Indexed`] each value is `100 * close / base`, where `base`
/// is the close of the ticker's earliest bar. A ticker whose base is zero or
/// not finite is left out, as is a ticker with no bars.
pub fn build_chart_series<'a, I>(inputs: I, mode: ChartMode) -> Vec<ChartPoint>
where
    I: IntoIterator<Item = (&'a Ticker, &'a [DailyBar])>,
{
    let mut timeline: BTreeMap<i64, BTreeMap<String, f64>> = BTreeMap::new();

    for (ticker, bars) in inputs {
        let mut closes: Vec<(i64, f64)> = bars.iter().map(|b| (b.timestamp, b.close)).collect();
        closes.sort_by_key(|&(t, _)| t);
        closes.dedup_by_key(|&mut (t, _)| t);

        for &(t, _) in &closes {
            timeline.entry(t).or_default();
        }

        let base = match mode {
            ChartMode::Raw => None,
            ChartMode::Indexed => match closes.first() {
                Some(&(_, base)) if base != 0.0 && base.is_finite() => Some(base),
                _ => continue,
            },
        };

        for (t, close) in closes {
            // close / base is exactly 1.0 at the base bar
            let value = base.map_or(close, |base| 100.0 * (close / base));
            timeline
                .entry(t)
                .or_default()
                .insert(ticker.to_string(), value);
        }
    }

    timeline
        .into_iter()
        .map(|(date, values)| ChartPoint { date, values })
        .collect()
}

/// Builds the chart series for fetched results.
pub fn chart_from_results(results: &[TickerResult], mode: ChartMode) -> Vec<ChartPoint> {
    build_chart_series(
        results.iter().map(|r| (&r.ticker, r.series.as_slice())),
        mode,
    )
}
