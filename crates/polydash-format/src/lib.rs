//! Output formatters for the polydash market dashboard.
//!
//! This crate provides formatters for writing chart series and card
//! metrics to various output formats:
//!
//! - [`CsvFormatter`] - CSV or TSV format
//! - [`JsonFormatter`] - JSON array or NDJSON format

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/polydash/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;

pub use crate::csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle};
