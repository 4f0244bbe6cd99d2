use std::time::Duration;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

/// How often a reminder fires, in whole minutes, between one minute and one
/// week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ReminderInterval(u64);

impl ReminderInterval {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(7 * 24 * 60);

    /// Try to create a [`ReminderInterval`] from a number of minutes. Every
    /// value that passes is at least [`ReminderInterval::MIN`], so timers never
    /// need to clamp it again.
    ///
    /// # Errors
    ///
    /// This function will return an error if the integer is zero or longer
    /// than [`ReminderInterval::MAX`].
    pub fn try_new(minutes: u64) -> Result<Self, TryNewReminderIntervalError> {
        ensure!(minutes > 0, ZeroSnafu);
        ensure!(
            minutes <= Self::MAX.0,
            TooLongSnafu {
                max: Self::MAX.0
            }
        );
        Ok(Self(minutes))
    }

    pub fn minutes(self) -> u64 {
        self.0
    }

    /// The interval as a [`Duration`].
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.0 * 60)
    }
}

impl TryFrom<u64> for ReminderInterval {
    type Error = TryNewReminderIntervalError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<ReminderInterval> for u64 {
    fn from(value: ReminderInterval) -> Self {
        value.0
    }
}

/// An error type of creating a [`ReminderInterval`].
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum TryNewReminderIntervalError {
    #[snafu(display("Interval must be at least one minute"))]
    #[non_exhaustive]
    Zero,
    #[snafu(display("Interval must be at most {max} minutes"))]
    #[non_exhaustive]
    TooLong { max: u64 },
}
