//! JSON output format.

use polydash_analytics::{CardMetrics, ChartPoint};
use polydash_types::Ticker;
use serde::Serialize;
use std::io::Write;

use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Output style.
    style: JsonStyle,
    /// Whether to pretty-print (only for array style).
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }

    /// Writes a single document, honoring `pretty`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_document<T, W>(&self, value: &T, mut writer: W) -> Result<(), FormatError>
    where
        T: Serialize + ?Sized,
        W: Write,
    {
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, value)?;
        } else {
            serde_json::to_writer(&mut writer, value)?;
        }
        writeln!(writer)?;
        Ok(())
    }

    fn write_records<T, W>(&self, records: &[T], mut writer: W) -> Result<(), FormatError>
    where
        T: Serialize,
        W: Write,
    {
        match self.style {
            JsonStyle::Array => self.write_document(records, writer),
            JsonStyle::Ndjson => {
                for record in records {
                    serde_json::to_writer(&mut writer, record)?;
                    writeln!(writer)?;
                }
                Ok(())
            }
        }
    }
}

impl Formatter for JsonFormatter {
    fn write_chart<W: Write + Send>(
        &self,
        _columns: &[Ticker],
        points: &[ChartPoint],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_records(points, writer)
    }

    fn write_cards<W: Write + Send>(
        &self,
        cards: &[CardMetrics],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_records(cards, writer)
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}
