//! Rate-limited market dashboard core.
//!
//! This is a facade crate that re-exports functionality from the polydash
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use polydash_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MarketDataClient::new(ClientConfig::new("YOUR_API_KEY"))?;
//!     let orchestrator = Orchestrator::new(client, OrchestratorConfig::default());
//!
//!     let tickers = Universe::global().enabled_tickers();
//!     let results = orchestrator.fetch_all(&tickers).await;
//!
//!     let dashboard = Dashboard::build(DateWindow::reference(), &results, ChartMode::Indexed);
//!     if let Some(stats) = &dashboard.stats {
//!         println!("Best performer: {}", stats.best_performer.ticker);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/polydash/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

#[cfg(feature = "analytics")]
mod dashboard;

// Re-export core types
pub use polydash_types::*;

// Re-export the ticker universe
pub use polydash_universe::Universe;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use polydash_fetch::{
    API_KEY_ENV, CancelHandle, CancelSignal, ClientConfig, ClientError, DEFAULT_REQUEST_DELAY,
    FetchEvent, FetchReport, FetchState, HttpResponse, MarketDataClient, Orchestrator,
    OrchestratorConfig, ReqwestTransport, TickerOutcome, TickerSource, Timer, TokioTimer,
    Transport, TransportError, cancel_pair, derive_summary, parse_aggregates,
};

// In-memory transport and timer for tests
#[cfg(feature = "test-util")]
pub use polydash_fetch::{MockTransport, RecordingTimer};

#[cfg(feature = "fetch")]
pub use polydash_fetch::url::{BASE_URL, aggregates_url, redact_api_key};

// Re-export analytics
#[cfg(feature = "analytics")]
pub use polydash_analytics::{
    AnalyticsError, CardMetrics, ChartMode, ChartPoint, Mover, Stats, build_chart_series,
    chart_from_results, compute_stats, percent_change,
};

#[cfg(feature = "analytics")]
pub use dashboard::Dashboard;

// Re-export formatters
#[cfg(feature = "format")]
pub use polydash_format::{CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat};

// Re-export the snapshot cache
#[cfg(feature = "cache")]
pub use polydash_cache::{CacheEntry, CacheError, CacheKey, DEFAULT_MAX_AGE, Snapshot, SnapshotCache};

/// Prelude module for convenient imports.
///
/// ```
/// use polydash_lib::prelude::*;
/// ```
pub mod prelude {
    pub use polydash_types::{
        DailyBar, DateWindow, FetchError, PolydashError, Result, Ticker, TickerResult,
        TickerSummary, Timespan,
    };

    pub use polydash_universe::Universe;

    #[cfg(feature = "fetch")]
    pub use polydash_fetch::{
        CancelSignal, ClientConfig, FetchReport, MarketDataClient, Orchestrator,
        OrchestratorConfig, cancel_pair,
    };

    #[cfg(feature = "analytics")]
    pub use polydash_analytics::{ChartMode, ChartPoint, Stats, build_chart_series, compute_stats};

    #[cfg(feature = "analytics")]
    pub use crate::Dashboard;

    #[cfg(feature = "format")]
    pub use polydash_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(feature = "cache")]
    pub use polydash_cache::{CacheKey, Snapshot, SnapshotCache};
}
