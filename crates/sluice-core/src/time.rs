//! The simulation clock.
//!
//! [`Minute`] counts whole minutes since the Unix epoch (UTC). The engine
//! does all of its arithmetic on this integer; conversion to and from the
//! `YYYY-MM-DDTHH:MM:SSZ` wire format happens only at the dataset boundary.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::fmt;
use std::ops::{Add, Sub};

/// Minutes in one simulated day.
pub const MINUTES_PER_DAY: i64 = 1440;

/// Wire format for every timestamp in the datasets. Lexicographic order
/// equals chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A UTC instant at minute resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Minute(pub i64);

impl Minute {
    /// Truncate a UTC datetime to the minute.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp().div_euclid(60))
    }

    /// Convert back to a UTC datetime.
    ///
    /// Returns `None` only for values outside chrono's representable range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.0.checked_mul(60)?, 0).single()
    }

    /// Parse a `YYYY-MM-DDTHH:MM:SSZ` timestamp. Seconds are truncated.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        let naive = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .or_else(|_| {
                DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc).naive_utc())
            })
            .map_err(|_| TimestampError {
                value: s.to_string(),
            })?;
        Ok(Self::from_datetime(naive.and_utc()))
    }

    /// Render in the dataset wire format.
    pub fn format(self) -> String {
        match self.to_datetime() {
            Some(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
            None => format!("minute:{}", self.0),
        }
    }

    /// Render the UTC calendar date as `YYYYMMDD` (ticket id namespace).
    pub fn date_stamp(self) -> String {
        match self.to_datetime() {
            Some(dt) => dt.format("%Y%m%d").to_string(),
            None => "00000000".to_string(),
        }
    }

    /// Hour of the UTC day, `0..24`.
    pub fn hour_of_day(self) -> u32 {
        (self.0.rem_euclid(MINUTES_PER_DAY) / 60) as u32
    }

    /// Offset this instant by a signed number of minutes.
    pub fn offset(self, minutes: i64) -> Self {
        Self(self.0 + minutes)
    }

    /// Whole minutes from `earlier` to `self` (negative if `self` is earlier).
    pub fn minutes_since(self, earlier: Minute) -> i64 {
        self.0 - earlier.0
    }

    /// The next minute.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Minute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl From<DateTime<Utc>> for Minute {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl Add<i64> for Minute {
    type Output = Minute;

    fn add(self, rhs: i64) -> Minute {
        self.offset(rhs)
    }
}

impl Sub<i64> for Minute {
    type Output = Minute;

    fn sub(self, rhs: i64) -> Minute {
        self.offset(-rhs)
    }
}

/// A timestamp string did not match the dataset wire format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimestampError {
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "timestamp '{}' is not in YYYY-MM-DDTHH:MM:SSZ form",
            self.value
        )
    }
}

impl std::error::Error for TimestampError {}
