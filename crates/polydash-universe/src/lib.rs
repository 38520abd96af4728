//! Ticker universe registry for the polydash market dashboard.
//!
//! The universe is an ordered list of tickers with display metadata. Order
//! matters: it is the order tickers are fetched in and the column order of
//! chart output.
//!
//! # Example
//!
//! ```
//! use polydash_universe::Universe;
//!
//! let universe = Universe::global();
//!
//! if let Some(info) = universe.get("tsla") {
//!     println!("{} is drawn in {}", info.name(), info.color());
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/polydash/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::sync::OnceLock;

use polydash_types::{Ticker, TickerInfo};

/// The universe metadata JSON embedded at compile time.
const UNIVERSE_JSON: &str = include_str!("../data/universe.json");

/// Global universe instance.
static UNIVERSE: OnceLock<Universe> = OnceLock::new();

/// Ordered registry of dashboard tickers.
#[derive(Debug, Clone)]
pub struct Universe {
    entries: Vec<TickerInfo>,
}

impl Universe {
    /// Returns the global universe.
    ///
    /// The universe is initialized lazily on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        UNIVERSE.get_or_init(Self::load)
    }

    /// Loads the universe from the embedded JSON data.
    fn load() -> Self {
        let entries: Vec<TickerInfo> =
            serde_json::from_str(UNIVERSE_JSON).expect("Invalid universe.json");
        Self { entries }
    }

    /// Creates a universe from explicit entries, keeping their order.
    #[must_use]
    pub const fn from_entries(entries: Vec<TickerInfo>) -> Self {
        Self { entries }
    }

    /// Looks up a ticker by symbol (case-insensitive).
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&TickerInfo> {
        let symbol = symbol.trim();
        self.entries
            .iter()
            .find(|info| info.ticker().as_str().eq_ignore_ascii_case(symbol))
    }

    /// Returns all entries in universe order.
    pub fn all(&self) -> impl Iterator<Item = &TickerInfo> {
        self.entries.iter()
    }

    /// Returns the entries fetched by default.
    pub fn enabled(&self) -> impl Iterator<Item = &TickerInfo> {
        self.entries.iter().filter(|info| info.is_enabled())
    }

    /// Returns the default ticker list in universe order.
    #[must_use]
    pub fn enabled_tickers(&self) -> Vec<Ticker> {
        self.enabled().map(|info| info.ticker().clone()).collect()
    }

    /// Returns every ticker in universe order.
    #[must_use]
    pub fn all_tickers(&self) -> Vec<Ticker> {
        self.all().map(|info| info.ticker().clone()).collect()
    }

    /// Returns the display name for a ticker, falling back to the symbol.
    #[must_use]
    pub fn display_name<'a>(&'a self, ticker: &'a Ticker) -> &'a str {
        self.get(ticker.as_str())
            .map_or(ticker.as_str(), TickerInfo::name)
    }

    /// Searches entries by symbol or name (case-insensitive).
    pub fn search(&self, pattern: &str) -> Vec<&TickerInfo> {
        let pattern = pattern.to_lowercase();
        self.entries
            .iter()
            .filter(|info| {
                info.ticker().as_str().to_lowercase().contains(&pattern)
                    || info.name().to_lowercase().contains(&pattern)
            })
            .collect()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the universe is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
