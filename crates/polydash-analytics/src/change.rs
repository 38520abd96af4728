//! Percentage change and per-ticker card metrics.

use polydash_types::{Ticker, TickerSummary};
use serde::{Deserialize, Serialize};

/// Returns `100 * (close - open) / open`.
///
/// Returns `None` when `open` is zero or either price is not finite, so
/// callers never see `inf` or `NaN`.
#[must_use]
pub fn percent_change(open: f64, close: f64) -> Option<f64> {
    if open == 0.0 || !open.is_finite() || !close.is_finite() {
        return None;
    }
    Some((close - open) / open * 100.0)
}

/// Display metrics for one ticker card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardMetrics {
    /// Ticker symbol.
    pub ticker: Ticker,
    /// Closing price.
    pub close: f64,
    /// Absolute move from open to close.
    pub change: f64,
    /// Percentage move from open to close, `None` for a zero open.
    pub change_percent: Option<f64>,
    /// True when the ticker closed at or above its open.
    pub is_positive: bool,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Volume-weighted average price.
    pub vwap: f64,
    /// Volume in millions of shares.
    pub volume_millions: f64,
}

impl CardMetrics {
    /// Derives card metrics from a summary.
    #[must_use]
    pub fn from_summary(summary: &TickerSummary) -> Self {
        Self {
            ticker: summary.ticker.clone(),
            close: summary.close,
            change: summary.change(),
            change_percent: percent_change(summary.open, summary.close),
            is_positive: summary.is_positive(),
            open: summary.open,
            high: summary.high,
            low: summary.low,
            vwap: summary.vwap,
            volume_millions: summary.volume_millions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use polydash_types::DailyBar;

    #[test]
    fn test_percent_change() {
        assert_relative_eq!(percent_change(220.0, 209.0).unwrap(), -5.0, epsilon = 1e-9);
        assert_relative_eq!(percent_change(100.0, 110.0).unwrap(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(percent_change(50.0, 50.0).unwrap(), 0.0);
    }

    #[test]
    fn test_percent_change_zero_open_is_undefined() {
        assert_eq!(percent_change(0.0, 10.0), None);
        assert_eq!(percent_change(0.0, 0.0), None);
        assert_eq!(percent_change(f64::NAN, 1.0), None);
        assert_eq!(percent_change(1.0, f64::INFINITY), None);
    }

    #[test]
    fn test_card_metrics() {
        let bar = DailyBar::new(2000, 220.0, 225.5, 205.25, 209.0, 212.125, 98_765_432);
        let summary = TickerSummary::from_bar(Ticker::new("TSLA").unwrap(), &bar);
        let card = CardMetrics::from_summary(&summary);

        assert_relative_eq!(card.change, -11.0);
        assert_relative_eq!(card.change_percent.unwrap(), -5.0, epsilon = 1e-9);
        assert!(!card.is_positive);
        assert_relative_eq!(card.volume_millions, 98.765432, epsilon = 1e-9);
    }

    #[test]
    fn test_card_metrics_flat_day_is_positive() {
        let bar = DailyBar::new(0, 0.0, 0.0, 0.0, 0.0, 0.0, 0);
        let summary = TickerSummary::from_bar(Ticker::new("ZERO").unwrap(), &bar);
        let card = CardMetrics::from_summary(&summary);

        assert!(card.is_positive);
        assert_eq!(card.change_percent, None);
    }
}
