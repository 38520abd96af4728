//! Display utilities and output formatting for the polydash CLI.

use anyhow::{Context, Result};
use clap::ValueEnum;
use polydash_lib::prelude::*;
use polydash_lib::{AnalyticsError, CardMetrics, JsonStyle, Mover};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Output format for exported data.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
        }
    }
}

/// Chart mode selectable on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum Mode {
    Raw,
    Indexed,
}

impl From<Mode> for ChartMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Raw => Self::Raw,
            Mode::Indexed => Self::Indexed,
        }
    }
}

/// Opens `output` for writing, or stdout when absent.
pub(crate) fn open_output(output: Option<&Path>) -> Result<Box<dyn Write + Send>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Writes the aligned chart series in `format`.
pub(crate) fn write_chart<W: Write + Send>(
    format: Format,
    columns: &[Ticker],
    points: &[ChartPoint],
    writer: W,
) -> Result<()> {
    match format {
        Format::Csv => CsvFormatter::new().write_chart(columns, points, writer)?,
        Format::Json => JsonFormatter::new()
            .with_pretty(true)
            .write_chart(columns, points, writer)?,
        Format::Ndjson => JsonFormatter::ndjson().write_chart(columns, points, writer)?,
    }
    Ok(())
}

/// Writes card metrics in `format`.
pub(crate) fn write_cards<W: Write + Send>(
    format: Format,
    cards: &[CardMetrics],
    writer: W,
) -> Result<()> {
    match format {
        Format::Csv => CsvFormatter::new().write_cards(cards, writer)?,
        Format::Json => JsonFormatter::new()
            .with_pretty(true)
            .write_cards(cards, writer)?,
        Format::Ndjson => JsonFormatter::new()
            .with_style(JsonStyle::Ndjson)
            .write_cards(cards, writer)?,
    }
    Ok(())
}

/// Writes the whole dashboard as one pretty JSON document.
pub(crate) fn write_dashboard_json<W: Write>(dashboard: &Dashboard, writer: W) -> Result<()> {
    JsonFormatter::new()
        .with_pretty(true)
        .write_document(dashboard, writer)
        .context("Failed to write dashboard")
}

/// Writes statistics as one pretty JSON document.
pub(crate) fn write_stats_json<W: Write>(stats: &Stats, writer: W) -> Result<()> {
    JsonFormatter::new()
        .with_pretty(true)
        .write_document(stats, writer)
        .context("Failed to write statistics")
}

/// Formats a percentage change with an explicit sign, or `n/a`.
pub(crate) fn format_percent(change: Option<f64>) -> String {
    change.map_or_else(|| "n/a".to_string(), |pct| format!("{pct:+.2}%"))
}

/// Formats a duration as `1h 2m 3s`, dropping leading zero units.
pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    match (hours, minutes) {
        (0, 0) => format!("{seconds}s"),
        (0, _) => format!("{minutes}m {seconds}s"),
        _ => format!("{hours}h {minutes}m {seconds}s"),
    }
}

fn format_date(timestamp_ms: Option<i64>) -> String {
    timestamp_ms
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map_or_else(|| "-".to_string(), |dt| dt.format("%Y-%m-%d").to_string())
}

/// Prints one card per ticker.
pub(crate) fn print_cards(dashboard: &Dashboard) {
    let universe = Universe::global();

    println!(
        "{:<8} {:<22} {:>10} {:>10} {:>9} {:>10} {:>10}",
        "TICKER", "NAME", "CLOSE", "CHANGE", "PCT", "VWAP", "VOL (M)"
    );
    println!("{}", "-".repeat(85));

    for card in &dashboard.cards {
        println!(
            "{:<8} {:<22} {:>10.2} {:>+10.2} {:>9} {:>10.2} {:>10.2}",
            card.ticker.as_str(),
            truncate(universe.display_name(&card.ticker), 22),
            card.close,
            card.change,
            format_percent(card.change_percent),
            card.vwap,
            card.volume_millions,
        );
    }
}

/// Prints the market overview block.
pub(crate) fn print_overview(stats: &Stats) {
    println!("Market Overview");
    println!("{}", "-".repeat(40));
    println!("  Best performer:  {}", format_mover(&stats.best_performer));
    println!("  Worst performer: {}", format_mover(&stats.worst_performer));
    println!(
        "  Average move:    {}",
        format_percent(Some(stats.average_move_percent))
    );
    println!(
        "  Breadth:         {} up / {} down / {} flat",
        stats.gainers, stats.losers, stats.unchanged
    );
    if !stats.excluded.is_empty() {
        let excluded: Vec<&str> = stats.excluded.iter().map(Ticker::as_str).collect();
        println!("  Not ranked:      {} (zero open)", excluded.join(", "));
    }
}

/// Describes why the market overview cannot be shown.
pub(crate) fn overview_unavailable(error: AnalyticsError) -> String {
    match error {
        AnalyticsError::EmptyInput => "Market Overview: no tickers with data".to_string(),
        AnalyticsError::NoMeasurableChange => {
            "Market Overview: n/a (no ticker has a measurable change)".to_string()
        }
    }
}

fn format_mover(mover: &Mover) -> String {
    format!(
        "{} {}",
        mover.ticker.as_str(),
        format_percent(Some(mover.change_percent))
    )
}

/// Prints the span and latest values of the chart series.
pub(crate) fn print_chart_summary(dashboard: &Dashboard) {
    let (Some(first), Some(last)) = (dashboard.chart.first(), dashboard.chart.last()) else {
        println!("Chart: no data points");
        return;
    };

    println!(
        "Chart ({}): {} points, {} to {}",
        dashboard.mode,
        dashboard.chart.len(),
        format_date(Some(first.date)),
        format_date(Some(last.date)),
    );

    for ticker in &dashboard.tickers {
        let latest = dashboard
            .chart
            .iter()
            .rev()
            .find_map(|point| point.value(ticker.as_str()));
        if let Some(value) = latest {
            println!("  {:<8} {:>10.2}", ticker.as_str(), value);
        }
    }
}

/// Prints the tickers that returned no data.
pub(crate) fn print_failed(failed: &[Ticker]) {
    if failed.is_empty() {
        return;
    }
    let symbols: Vec<&str> = failed.iter().map(Ticker::as_str).collect();
    println!("No data for: {}", symbols.join(", "));
}

/// Describes the window and chart mode of a dashboard.
pub(crate) fn describe_window(dashboard: &Dashboard) -> String {
    format!(
        "{} to {} ({} mode)",
        dashboard.window.start, dashboard.window.end, dashboard.mode
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}~")
    }
}
