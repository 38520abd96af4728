//! Ticker symbols and universe metadata.

use serde::{Deserialize, Serialize};

use crate::TickerError;

/// Maximum accepted symbol length.
const MAX_TICKER_LEN: usize = 12;

/// A validated ticker symbol.
///
/// Symbols are trimmed and uppercased on construction and may only contain
/// ASCII letters, digits, `.` and `-` (e.g. `BRK.B`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Creates a ticker from a raw symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol is empty, too long, or contains
    /// characters outside `[A-Za-z0-9.-]`.
    pub fn new(symbol: &str) -> Result<Self, TickerError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(TickerError::Empty);
        }
        if symbol.len() > MAX_TICKER_LEN {
            return Err(TickerError::TooLong(symbol.to_string()));
        }
        if let Some(ch) = symbol
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '.' || *c == '-'))
        {
            return Err(TickerError::InvalidCharacter {
                symbol: symbol.to_string(),
                ch,
            });
        }
        Ok(Self(symbol.to_ascii_uppercase()))
    }

    /// Parses a comma-separated list of symbols, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the first invalid symbol's error.
    pub fn parse_list(list: &str) -> Result<Vec<Self>, TickerError> {
        list.split(',')
            .filter(|s| !s.trim().is_empty())
            .map(Self::new)
            .collect()
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Ticker {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = TickerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Display metadata for a ticker in the dashboard universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerInfo {
    /// Ticker symbol.
    ticker: Ticker,
    /// Company name shown next to the symbol.
    name: String,
    /// Chart line color (CSS color string).
    color: String,
    /// Whether the ticker is fetched by default.
    #[serde(default)]
    enabled: bool,
}

impl TickerInfo {
    /// Creates new ticker metadata.
    #[must_use]
    pub fn new(ticker: Ticker, name: impl Into<String>, color: impl Into<String>, enabled: bool) -> Self {
        Self {
            ticker,
            name: name.into(),
            color: color.into(),
            enabled,
        }
    }

    /// Returns the ticker symbol.
    #[must_use]
    pub const fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Returns the company name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the chart color.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns true if the ticker is part of the default fetch list.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl std::fmt::Display for TickerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_normalizes_case_and_whitespace() {
        let ticker = Ticker::new("  tsla ").unwrap();
        assert_eq!(ticker.as_str(), "TSLA");
        assert_eq!(ticker.to_string(), "TSLA");
    }

    #[test]
    fn test_ticker_accepts_share_classes() {
        assert_eq!(Ticker::new("brk.b").unwrap().as_str(), "BRK.B");
        assert_eq!(Ticker::new("bf-b").unwrap().as_str(), "BF-B");
    }

    #[test]
    fn test_ticker_rejects_invalid() {
        assert_eq!(Ticker::new("   "), Err(TickerError::Empty));
        assert!(matches!(
            Ticker::new("TS/LA"),
            Err(TickerError::InvalidCharacter { ch: '/', .. })
        ));
        assert!(matches!(
            Ticker::new("ABCDEFGHIJKLMNOP"),
            Err(TickerError::TooLong(_))
        ));
    }

    #[test]
    fn test_parse_list_preserves_order() {
        let tickers = Ticker::parse_list("aapl, msft,,tsla").unwrap();
        let symbols: Vec<_> = tickers.iter().map(Ticker::as_str).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "TSLA"]);
    }

    #[test]
    fn test_ticker_deserialize_validates() {
        let ticker: Ticker = serde_json::from_str("\"nvda\"").unwrap();
        assert_eq!(ticker.as_str(), "NVDA");
        assert!(serde_json::from_str::<Ticker>("\"bad symbol\"").is_err());
    }

    #[test]
    fn test_ticker_info_display() {
        let info = TickerInfo::new(Ticker::new("TSLA").unwrap(), "Tesla", "hsl(0, 72%, 51%)", true);
        assert_eq!(info.to_string(), "Tesla (TSLA)");
        assert!(info.is_enabled());
    }
}
