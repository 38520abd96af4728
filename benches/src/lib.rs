//! Synthetic market data for polydash benchmarks.

use polydash_lib::{DailyBar, Ticker, TickerResult, TickerSummary};

/// Milliseconds in one day.
const DAY_MS: i64 = 86_400_000;

/// First bar timestamp: 2024-09-16 00:00 UTC.
const START_MS: i64 = 1_726_444_800_000;

/// Generates `days` deterministic daily bars starting at `base` price.
///
/// Prices follow a bounded sawtooth so every run sees the same data.
pub fn synthetic_bars(base: f64, days: usize) -> Vec<DailyBar> {
    (0..days)
        .map(|i| {
            let drift = ((i % 17) as f64 - 8.0) * 0.004;
            let open = base * (1.0 + drift);
            let close = open * (1.0 + ((i % 5) as f64 - 2.0) * 0.003);
            let high = open.max(close) * 1.01;
            let low = open.min(close) * 0.99;
            let vwap = (open + close + high + low) / 4.0;
            DailyBar::new(
                START_MS + i as i64 * DAY_MS,
                open,
                high,
                low,
                close,
                vwap,
                1_000_000 + (i as u64 % 13) * 250_000,
            )
        })
        .collect()
}

/// Generates `tickers` results of `days` bars each.
///
/// Every other ticker starts one day later so the chart timeline has gaps.
pub fn synthetic_results(tickers: usize, days: usize) -> Vec<TickerResult> {
    (0..tickers)
        .filter_map(|t| {
            let ticker = Ticker::new(&format!("T{t}")).ok()?;
            let mut series = synthetic_bars(50.0 + t as f64 * 25.0, days);
            if t % 2 == 1 && !series.is_empty() {
                series.remove(0);
            }
            let summary = TickerSummary::from_bar(ticker.clone(), series.last()?);
            Some(TickerResult {
                ticker,
                summary,
                series,
            })
        })
        .collect()
}
