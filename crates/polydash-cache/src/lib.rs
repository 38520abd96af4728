//! Snapshot cache for the polydash market dashboard.
//!
//! A fetch over seven tickers takes a minute and a half of enforced delays,
//! so the CLI keeps the last result per ticker list and window on disk and
//! reuses it while it is fresh:
//!
//! - [`SnapshotCache`] - Reads and writes snapshot files
//! - [`Snapshot`] - One stored fetch result
//! - [`CacheKey`] - Identity of a snapshot

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/polydash/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod snapshot;
mod store;

pub use snapshot::{CacheKey, DEFAULT_MAX_AGE, Snapshot};
pub use store::{CacheEntry, CacheError, Result, SnapshotCache};
