//! Market data fetching for the polydash market dashboard.
//!
//! This crate provides the data acquisition pipeline:
//!
//! - [`url::aggregates_url`] - Constructs aggregates endpoint URLs
//! - [`MarketDataClient`] - Fetches and decodes one ticker, with retries
//! - [`parse_aggregates`] - Decodes aggregates responses into bars
//! - [`Orchestrator`] - Sequential, rate-limited fetching across tickers
//! - [`Transport`] and [`Timer`] - Injectable I/O seams

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/polydash/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cancel;
mod client;
mod orchestrator;
mod parse;
mod timer;
mod transport;
pub mod url;

pub use cancel::{CancelHandle, CancelSignal, cancel_pair};
pub use client::{
    API_KEY_ENV, ClientConfig, ClientError, MarketDataClient, TickerSource, derive_summary,
};
pub use orchestrator::{
    DEFAULT_REQUEST_DELAY, FetchEvent, FetchReport, FetchState, Orchestrator, OrchestratorConfig,
    TickerOutcome,
};
pub use parse::{AggregatesResponse, STATUS_OK, WireBar, parse_aggregates};
pub use timer::{Timer, TokioTimer};
pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportError};

#[cfg(any(test, feature = "test-util"))]
pub use timer::RecordingTimer;
#[cfg(any(test, feature = "test-util"))]
pub use transport::MockTransport;
