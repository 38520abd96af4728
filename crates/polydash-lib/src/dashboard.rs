//! Assembled dashboard view.

use polydash_analytics::{
    AnalyticsError, CardMetrics, ChartMode, ChartPoint, Stats, chart_from_results, compute_stats,
};
use polydash_types::{DateWindow, Ticker, TickerResult};
use serde::Serialize;

/// Everything the dashboard renders for one fetch: a card per ticker, the
/// cross-ticker statistics and the aligned chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Window the data covers.
    pub window: DateWindow,
    /// Chart mode used for `chart`.
    pub mode: ChartMode,
    /// Tickers with data, in request order. This is the chart column order.
    pub tickers: Vec<Ticker>,
    /// Card metrics, in request order.
    pub cards: Vec<CardMetrics>,
    /// Statistics, absent when no ticker has a measurable change.
    pub stats: Option<Stats>,
    /// Why `stats` is absent.
    #[serde(skip)]
    pub stats_error: Option<AnalyticsError>,
    /// Aligned chart series.
    pub chart: Vec<ChartPoint>,
    /// Tickers that were requested but produced no data.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<Ticker>,
}

impl Dashboard {
    /// Builds the dashboard from fetched results.
    #[must_use]
    pub fn build(window: DateWindow, results: &[TickerResult], mode: ChartMode) -> Self {
        let (stats, stats_error) = match compute_stats(results.iter().map(|r| &r.summary)) {
            Ok(stats) => (Some(stats), None),
            Err(e) => (None, Some(e)),
        };
        Self {
            window,
            mode,
            tickers: results.iter().map(|r| r.ticker.clone()).collect(),
            cards: results
                .iter()
                .map(|r| CardMetrics::from_summary(&r.summary))
                .collect(),
            stats,
            stats_error,
            chart: chart_from_results(results, mode),
            failed: Vec::new(),
        }
    }

    /// Records the tickers that failed to fetch.
    #[must_use]
    pub fn with_failed(mut self, failed: Vec<Ticker>) -> Self {
        self.failed = failed;
        self
    }

    /// Returns true if no ticker produced data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
