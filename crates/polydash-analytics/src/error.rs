//! Analytics error types.

use thiserror::Error;

/// Errors from the aggregate transforms.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsError {
    /// No summaries were supplied.
    #[error("Cannot compute statistics over an empty ticker list")]
    EmptyInput,

    /// Every summary had an undefined change (zero open).
    #[error("No ticker has a measurable change")]
    NoMeasurableChange,
}
