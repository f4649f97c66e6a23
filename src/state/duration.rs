//! Hour/minute/second duration value

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Exclusive upper bound of the hours picker
pub const HOURS_LIMIT: u32 = 24;
/// Exclusive upper bound of the minutes and seconds pickers
pub const MINUTES_LIMIT: u32 = 60;
pub const SECONDS_LIMIT: u32 = 60;

const SECONDS_PER_DAY: u64 = 86_400;

/// A span of time as shown on the flip clock and edited in the picker.
///
/// Components are not range-checked on construction; callers that accept
/// user input go through [`DurationValue::validate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationValue {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl DurationValue {
    pub const ZERO: DurationValue = DurationValue {
        hour: 0,
        minute: 0,
        second: 0,
    };

    pub fn new(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hour) * 3600 + u64::from(self.minute) * 60 + u64::from(self.second)
    }

    pub fn is_zero(&self) -> bool {
        self.hour == 0 && self.minute == 0 && self.second == 0
    }

    /// Check every component against the picker ranges
    pub fn validate(&self) -> Result<(), TimerError> {
        check("hour", self.hour, HOURS_LIMIT)?;
        check("minute", self.minute, MINUTES_LIMIT)?;
        check("second", self.second, SECONDS_LIMIT)
    }
}

fn check(field: &'static str, value: u32, limit: u32) -> Result<(), TimerError> {
    if value >= limit {
        return Err(TimerError::OutOfRange {
            field,
            value,
            limit,
        });
    }
    Ok(())
}

/// Split a seconds counter back into clock components.
///
/// Hours wrap modulo 24, so anything from a full day upwards folds back
/// onto the dial.
pub fn decompose(total_seconds: u64) -> DurationValue {
    let wrapped = total_seconds % SECONDS_PER_DAY;
    DurationValue {
        hour: (wrapped / 3600) as u32,
        minute: ((wrapped / 60) % 60) as u32,
        second: (wrapped % 60) as u32,
    }
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_seconds_and_zero() {
        assert_eq!(DurationValue::new(1, 2, 3).total_seconds(), 3723);
        assert_eq!(DurationValue::new(0, 60, 0).total_seconds(), 3600);
        assert!(DurationValue::default().is_zero());
        assert!(!DurationValue::new(0, 0, 1).is_zero());
    }

    #[test]
    fn test_decompose() {
        assert_eq!(decompose(0), DurationValue::ZERO);
        assert_eq!(decompose(4), DurationValue::new(0, 0, 4));
        assert_eq!(decompose(3661), DurationValue::new(1, 1, 1));
        assert_eq!(decompose(86_399), DurationValue::new(23, 59, 59));
    }

    #[test]
    fn test_decompose_wraps_hours_at_a_day() {
        assert_eq!(decompose(86_400), DurationValue::ZERO);
        assert_eq!(decompose(90_061), DurationValue::new(1, 1, 1));

        for s in [0u64, 59, 3599, 86_399, 86_400, 100_000, 1_000_000, u64::from(u32::MAX)] {
            assert_eq!(decompose(s).total_seconds() % 86_400, s % 86_400);
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(DurationValue::new(23, 59, 59).validate().is_ok());

        match DurationValue::new(24, 0, 0).validate() {
            Err(TimerError::OutOfRange { field, value, limit }) => {
                assert_eq!(field, "hour");
                assert_eq!(value, 24);
                assert_eq!(limit, 24);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(DurationValue::new(0, 60, 0).validate().is_err());
        assert!(DurationValue::new(0, 0, 75).validate().is_err());
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(DurationValue::new(1, 5, 9).to_string(), "01:05:09");
        assert_eq!(DurationValue::ZERO.to_string(), "00:00:00");
    }
}
