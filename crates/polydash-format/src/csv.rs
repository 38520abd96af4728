//! CSV output format.

use polydash_analytics::{CardMetrics, ChartPoint};
use polydash_types::Ticker;
use std::io::Write;

use crate::{FormatError, Formatter};

/// CSV formatter.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            include_header: true,
        }
    }
}

fn format_date(point: &ChartPoint) -> String {
    point
        .datetime()
        .map_or_else(|| point.date.to_string(), |dt| dt.format("%Y-%m-%d").to_string())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl Formatter for CsvFormatter {
    fn write_chart<W: Write + Send>(
        &self,
        columns: &[Ticker],
        points: &[ChartPoint],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            write!(writer, "date")?;
            for ticker in columns {
                write!(writer, "{d}{ticker}")?;
            }
            writeln!(writer)?;
        }

        for point in points {
            write!(writer, "{}", format_date(point))?;
            for ticker in columns {
                write!(writer, "{d}{}", optional(point.value(ticker.as_str())))?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }

    fn write_cards<W: Write + Send>(
        &self,
        cards: &[CardMetrics],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(
                writer,
                "ticker{d}close{d}change{d}change_percent{d}open{d}high{d}low{d}vwap{d}volume_millions"
            )?;
        }

        for card in cards {
            writeln!(
                writer,
                "{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}",
                card.ticker,
                card.close,
                card.change,
                optional(card.change_percent),
                card.open,
                card.high,
                card.low,
                card.vwap,
                card.volume_millions
            )?;
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}
