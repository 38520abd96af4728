//! Aggregate statistics across ticker summaries.

use polydash_types::{Ticker, TickerSummary};
use serde::{Deserialize, Serialize};

use crate::{AnalyticsError, percent_change};

/// A ticker and its percentage move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    /// Ticker symbol.
    pub ticker: Ticker,
    /// Percentage move from open to close.
    pub change_percent: f64,
}

/// Cross-ticker overview of the latest session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Ticker with the largest percentage move. First wins on ties.
    pub best_performer: Mover,
    /// Ticker with the smallest percentage move. First wins on ties.
    pub worst_performer: Mover,
    /// Arithmetic mean of the percentage moves.
    pub average_move_percent: f64,
    /// Tickers with a strictly positive move.
    pub gainers: usize,
    /// Tickers with a strictly negative move.
    pub losers: usize,
    /// Tickers with a zero move.
    pub unchanged: usize,
    /// Tickers left out because their move is undefined (zero open).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<Ticker>,
}

impl Stats {
    /// Returns the number of tickers that took part in the statistics.
    #[must_use]
    pub const fn measured(&self) -> usize {
        self.gainers + self.losers + self.unchanged
    }
}

/// Computes best/worst movers, the mean move and gainer/loser counts.
///
/// Summaries are visited in input order. Tickers whose move is undefined are
/// listed in [`Stats::excluded`] and otherwise ignored.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyInput`] for no summaries and
/// [`AnalyticsError::NoMeasurableChange`] if every move is undefined.
pub fn compute_stats<'a, I>(summaries: I) -> Result<Stats, AnalyticsError>
where
    I: IntoIterator<Item = &'a TickerSummary>,
{
    let mut seen = 0usize;
    let mut excluded = Vec::new();
    let mut best: Option<Mover> = None;
    let mut worst: Option<Mover> = None;
    let mut sum = 0.0;
    let (mut gainers, mut losers, mut unchanged) = (0, 0, 0);

    for summary in summaries {
        seen += 1;
        let Some(change) = percent_change(summary.open, summary.close) else {
            excluded.push(summary.ticker.clone());
            continue;
        };

        sum += change;
        if change > 0.0 {
            gainers += 1;
        } else if change < 0.0 {
            losers += 1;
        } else {
            unchanged += 1;
        }

        if best.as_ref().is_none_or(|b| change > b.change_percent) {
            best = Some(Mover {
                ticker: summary.ticker.clone(),
                change_percent: change,
            });
        }
        if worst.as_ref().is_none_or(|w| change < w.change_percent) {
            worst = Some(Mover {
                ticker: summary.ticker.clone(),
                change_percent: change,
            });
        }
    }

    if seen == 0 {
        return Err(AnalyticsError::EmptyInput);
    }
    let (Some(best_performer), Some(worst_performer)) = (best, worst) else {
        return Err(AnalyticsError::NoMeasurableChange);
    };

    let measured = gainers + losers + unchanged;
    Ok(Stats {
        best_performer,
        worst_performer,
        average_move_percent: sum / measured as f64,
        gainers,
        losers,
        unchanged,
        excluded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use polydash_types::DailyBar;

    fn summary(symbol: &str, open: f64, close: f64) -> TickerSummary {
        TickerSummary::from_bar(
            Ticker::new(symbol).unwrap(),
            &DailyBar::new(0, open, open.max(close), open.min(close), close, close, 1),
        )
    }

    #[test]
    fn test_empty_input() {
        let empty: [TickerSummary; 0] = [];
        assert_eq!(compute_stats(&empty), Err(AnalyticsError::EmptyInput));
    }

    #[test]
    fn test_single_ticker() {
        let summaries = [summary("TSLA", 220.0, 209.0)];
        let stats = compute_stats(&summaries).unwrap();

        assert_eq!(stats.best_performer, stats.worst_performer);
        assert_eq!(stats.best_performer.ticker.as_str(), "TSLA");
        assert_relative_eq!(stats.best_performer.change_percent, -5.0, epsilon = 1e-9);
        assert_relative_eq!(stats.average_move_percent, -5.0, epsilon = 1e-9);
        assert_eq!((stats.gainers, stats.losers, stats.unchanged), (0, 1, 0));
    }

    #[test]
    fn test_best_worst_and_counts() {
        let summaries = [
            summary("AAPL", 100.0, 110.0),
            summary("MSFT", 100.0, 100.0),
            summary("NVDA", 100.0, 80.0),
            summary("META", 100.0, 105.0),
        ];
        let stats = compute_stats(&summaries).unwrap();

        assert_eq!(stats.best_performer.ticker.as_str(), "AAPL");
        assert_eq!(stats.worst_performer.ticker.as_str(), "NVDA");
        assert_relative_eq!(stats.average_move_percent, -1.25, epsilon = 1e-9);
        assert_eq!(stats.gainers, 2);
        assert_eq!(stats.losers, 1);
        assert_eq!(stats.unchanged, 1);
        assert_eq!(stats.measured(), 4);
    }

    #[test]
    fn test_ties_keep_first() {
        let summaries = [
            summary("A", 100.0, 110.0),
            summary("B", 100.0, 110.0),
            summary("C", 100.0, 90.0),
            summary("D", 100.0, 90.0),
        ];
        let stats = compute_stats(&summaries).unwrap();
        assert_eq!(stats.best_performer.ticker.as_str(), "A");
        assert_eq!(stats.worst_performer.ticker.as_str(), "C");

        let flat = [summary("X", 10.0, 10.0), summary("Y", 20.0, 20.0)];
        let stats = compute_stats(&flat).unwrap();
        assert_eq!(stats.best_performer.ticker.as_str(), "X");
        assert_eq!(stats.worst_performer.ticker.as_str(), "X");
    }

    #[test]
    fn test_zero_open_is_excluded() {
        let summaries = [summary("ZERO", 0.0, 5.0), summary("TSLA", 220.0, 209.0)];
        let stats = compute_stats(&summaries).unwrap();

        assert_eq!(stats.excluded, vec![Ticker::new("ZERO").unwrap()]);
        assert_eq!(stats.best_performer.ticker.as_str(), "TSLA");
        assert_eq!(stats.measured(), 1);
        assert!(stats.average_move_percent.is_finite());
    }

    #[test]
    fn test_all_zero_open() {
        let summaries = [summary("Z1", 0.0, 1.0), summary("Z2", 0.0, 0.0)];
        assert_eq!(
            compute_stats(&summaries),
            Err(AnalyticsError::NoMeasurableChange)
        );
    }
}
