//! Types describing how often a replication cycle runs.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Error types for schedule parsing.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Your answer - '{0}' did not match the required format (e.g. \"5 minutes\")")]
    InvalidFormat(String),

    #[error("Interval count must be positive: '{0}'")]
    ZeroCount(String),
}

/// Unit of a replication interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl IntervalUnit {
    /// Number of seconds in one unit.
    pub fn seconds(self) -> u64 {
        match self {
            IntervalUnit::Seconds => 1,
            IntervalUnit::Minutes => 60,
            IntervalUnit::Hours => 60 * 60,
            IntervalUnit::Days => 24 * 60 * 60,
            IntervalUnit::Weeks => 7 * 24 * 60 * 60,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IntervalUnit::Seconds => "seconds",
            IntervalUnit::Minutes => "minutes",
            IntervalUnit::Hours => "hours",
            IntervalUnit::Days => "days",
            IntervalUnit::Weeks => "weeks",
        }
    }

    pub(crate) fn from_word(word: &str) -> Option<Self> {
        match word {
            "seconds" => Some(IntervalUnit::Seconds),
            "minutes" => Some(IntervalUnit::Minutes),
            "hours" => Some(IntervalUnit::Hours),
            "days" => Some(IntervalUnit::Days),
            "weeks" => Some(IntervalUnit::Weeks),
            _ => None,
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated replication interval, e.g. `5 minutes`.
///
/// Read from its textual form so config files say `"5 minutes"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct ScheduleSpec {
    pub count: u8,
    pub unit: IntervalUnit,
}

impl ScheduleSpec {
    /// Wait between two consecutive cycles.
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.count) * self.unit.seconds())
    }
}

impl fmt::Display for ScheduleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count, self.unit)
    }
}

impl TryFrom<String> for ScheduleSpec {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_seconds() {
        assert_eq!(IntervalUnit::Seconds.seconds(), 1);
        assert_eq!(IntervalUnit::Minutes.seconds(), 60);
        assert_eq!(IntervalUnit::Hours.seconds(), 3_600);
        assert_eq!(IntervalUnit::Days.seconds(), 86_400);
        assert_eq!(IntervalUnit::Weeks.seconds(), 604_800);
    }

    #[test]
    fn test_as_duration() {
        let spec = ScheduleSpec {
            count: 12,
            unit: IntervalUnit::Minutes,
        };
        assert_eq!(spec.as_duration(), Duration::from_secs(720));
    }

    #[test]
    fn test_display() {
        let spec = ScheduleSpec {
            count: 3,
            unit: IntervalUnit::Days,
        };
        assert_eq!(spec.to_string(), "3 days");
    }

    #[test]
    fn test_try_from_string() {
        let spec = ScheduleSpec::try_from("2 weeks".to_string()).unwrap();
        assert_eq!(spec.unit, IntervalUnit::Weeks);
        assert!(matches!(
            ScheduleSpec::try_from("0 weeks".to_string()),
            Err(ScheduleError::ZeroCount(_))
        ));
    }
}
