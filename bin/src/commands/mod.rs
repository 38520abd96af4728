//! Command implementations for the polydash CLI.

pub(crate) mod cache;
pub(crate) mod chart;
pub(crate) mod dashboard;
pub(crate) mod fetch;
pub(crate) mod info;
pub(crate) mod list;
pub(crate) mod stats;
