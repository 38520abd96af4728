//! Analytics for the polydash market dashboard.
//!
//! This crate provides the pure transforms applied to fetched data:
//!
//! - [`percent_change`] - Open-to-close move, undefined for a zero open
//! - [`CardMetrics`] - Per-ticker display metrics
//! - [`build_chart_series`] - Aligned raw or indexed chart series
//! - [`compute_stats`] - Best/worst movers, mean move and counts

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/polydash/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod change;
mod chart;
mod error;
mod stats;

pub use change::{CardMetrics, percent_change};
pub use chart::{ChartMode, ChartPoint, build_chart_series, chart_from_results};
pub use error::AnalyticsError;
pub use stats::{Mover, Stats, compute_stats};
