//! Inclusive date windows for historical requests.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::DateWindowError;

/// Length of the default historical window in calendar days.
pub const DEFAULT_WINDOW_DAYS: u64 = 90;

/// Returns the pinned end date of the default window.
///
/// 2024-12-13 is a Friday with complete market data; pinning it keeps the
/// window free of weekends and partial sessions.
#[must_use]
pub fn reference_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 13).expect("valid reference date")
}

/// A window of dates for data retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateWindow {
    /// Creates a new date window, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateWindowError> {
        if start > end {
            return Err(DateWindowError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a window covering `days` calendar days before `end`, up to and
    /// including `end`.
    #[must_use]
    pub fn trailing_days(end: NaiveDate, days: u64) -> Self {
        let start = end.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    /// Returns the default window: 90 days ending at the pinned reference date.
    #[must_use]
    pub fn reference() -> Self {
        Self::trailing_days(reference_end_date(), DEFAULT_WINDOW_DAYS)
    }

    /// Parses `YYYY-MM-DD` start and end strings into a window.
    ///
    /// # Errors
    ///
    /// Returns an error if either date is malformed or start > end.
    pub fn parse(start: &str, end: &str) -> Result<Self, DateWindowError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Returns the total number of days in the window.
    #[must_use]
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Returns true if the window contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl Default for DateWindow {
    fn default() -> Self {
        Self::reference()
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, DateWindowError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| DateWindowError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_new() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let window = DateWindow::new(start, end).unwrap();

        assert_eq!(window.start, start);
        assert_eq!(window.end, end);
        assert_eq!(window.total_days(), 31);
    }

    #[test]
    fn test_window_invalid() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(DateWindow::new(start, end).is_err());
    }

    #[test]
    fn test_reference_window() {
        let window = DateWindow::reference();
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2024, 12, 13).unwrap());
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 9, 14).unwrap());
        assert_eq!(window.to_string(), "2024-09-14 to 2024-12-13");
    }

    #[test]
    fn test_parse() {
        let window = DateWindow::parse("2024-09-16", "2024-12-13").unwrap();
        assert!(window.contains(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2024, 9, 15).unwrap()));
        assert!(matches!(
            DateWindow::parse("2024/09/16", "2024-12-13"),
            Err(DateWindowError::InvalidDate(_))
        ));
    }
}
