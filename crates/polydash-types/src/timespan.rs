//! Aggregate bar timespan definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Size of the time bucket for aggregate bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Timespan {
    /// Minute bars.
    Minute,
    /// Hourly bars.
    Hour,
    /// Daily bars.
    #[default]
    Day,
    /// Weekly bars.
    Week,
    /// Monthly bars.
    Month,
    /// Quarterly bars.
    Quarter,
    /// Yearly bars.
    Year,
}

impl Timespan {
    /// Returns the path segment used by the aggregates endpoint.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Returns all available timespans.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Minute,
            Self::Hour,
            Self::Day,
            Self::Week,
            Self::Month,
            Self::Quarter,
            Self::Year,
        ]
    }
}

impl std::fmt::Display for Timespan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timespan {
    type Err = TimespanParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minute" | "min" | "m" => Ok(Self::Minute),
            "hour" | "h" => Ok(Self::Hour),
            "day" | "d" | "daily" => Ok(Self::Day),
            "week" | "w" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            "quarter" | "q" => Ok(Self::Quarter),
            "year" | "y" | "yearly" => Ok(Self::Year),
            _ => Err(TimespanParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid timespan string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimespanParseError(String);

impl std::fmt::Display for TimespanParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid timespan '{}', expected one of: minute, hour, day, week, month, quarter, year",
            self.0
        )
    }
}

impl std::error::Error for TimespanParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timespan_parse() {
        assert_eq!("day".parse::<Timespan>().unwrap(), Timespan::Day);
        assert_eq!("Weekly".parse::<Timespan>().unwrap(), Timespan::Week);
        assert_eq!("M".parse::<Timespan>().unwrap(), Timespan::Minute);
        assert!("fortnight".parse::<Timespan>().is_err());
    }

    #[test]
    fn test_timespan_default_is_day() {
        assert_eq!(Timespan::default(), Timespan::Day);
        assert_eq!(Timespan::default().to_string(), "day");
    }
}
