//! Core types for the polydash market dashboard.
//!
//! This crate provides the fundamental data structures used throughout polydash:
//!
//! - [`DailyBar`] - One OHLCV observation for a trading day
//! - [`TickerSummary`] - Previous-day view derived from the most recent bar
//! - [`TickerResult`] - Summary plus full series for one ticker
//! - [`Ticker`] - Validated, uppercase ticker symbol
//! - [`TickerInfo`] - Display metadata for a ticker in the universe
//! - [`Timespan`] - Aggregate bar bucket size
//! - [`DateWindow`] - Inclusive date window for historical requests

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/polydash/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod error;
mod ticker;
mod timespan;
mod window;

pub use bar::{DailyBar, TickerResult, TickerSeries, TickerSummary};
pub use error::{ConfigError, DateWindowError, FetchError, PolydashError, Result, TickerError};
pub use ticker::{Ticker, TickerInfo};
pub use timespan::{Timespan, TimespanParseError};
pub use window::{DEFAULT_WINDOW_DAYS, DateWindow, reference_end_date};
