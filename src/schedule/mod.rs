//! Replication interval parsing.
//!
//! Intervals are written as a one or two digit count followed by a unit
//! word, for example `30 seconds` or `2 weeks`. The string is validated once
//! at startup and turned into a [`ScheduleSpec`]; the scheduler only ever
//! sees the resulting [`std::time::Duration`].

mod types;

pub use types::{IntervalUnit, ScheduleError, ScheduleSpec};

use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

static INTERVAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}) (seconds|minutes|hours|days|weeks)$")
        .expect("interval pattern should compile")
});

impl FromStr for ScheduleSpec {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = INTERVAL_PATTERN
            .captures(s)
            .ok_or_else(|| ScheduleError::InvalidFormat(s.to_string()))?;

        let count: u8 = caps[1]
            .parse()
            .map_err(|_| ScheduleError::InvalidFormat(s.to_string()))?;
        let unit = IntervalUnit::from_word(&caps[2])
            .ok_or_else(|| ScheduleError::InvalidFormat(s.to_string()))?;

        if count == 0 {
            return Err(ScheduleError::ZeroCount(s.to_string()));
        }

        Ok(Self { count, unit })
    }
}

/// Parse an interval string; used as a clap value parser.
pub fn parse_interval(s: &str) -> Result<ScheduleSpec, ScheduleError> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_accepted_intervals() {
        let cases = [
            ("5 seconds", 5, IntervalUnit::Seconds),
            ("12 minutes", 12, IntervalUnit::Minutes),
            ("1 hours", 1, IntervalUnit::Hours),
            ("7 days", 7, IntervalUnit::Days),
            ("99 weeks", 99, IntervalUnit::Weeks),
        ];

        for (input, count, unit) in cases {
            let spec: ScheduleSpec = input.parse().unwrap();
            assert_eq!(spec.count, count, "count for {input}");
            assert_eq!(spec.unit, unit, "unit for {input}");
        }
    }

    #[test]
    fn test_parse_rejected_intervals() {
        for input in [
            "5 sec",
            "seconds 5",
            "5",
            "100 seconds",
            "",
            "5  seconds",
            " 5 seconds",
            "5 seconds ",
            "5 Seconds",
            "-5 seconds",
        ] {
            assert!(
                matches!(
                    input.parse::<ScheduleSpec>(),
                    Err(ScheduleError::InvalidFormat(_))
                ),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_zero_count() {
        assert_eq!(
            "0 seconds".parse::<ScheduleSpec>(),
            Err(ScheduleError::ZeroCount("0 seconds".to_string()))
        );
        assert!(matches!(
            "00 minutes".parse::<ScheduleSpec>(),
            Err(ScheduleError::ZeroCount(_))
        ));
    }

    #[test]
    fn test_parse_leading_zero() {
        let spec: ScheduleSpec = "05 minutes".parse().unwrap();
        assert_eq!(spec.as_duration(), Duration::from_secs(300));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let spec = parse_interval("42 hours").unwrap();
        assert_eq!(spec.to_string(), "42 hours");
    }
}
