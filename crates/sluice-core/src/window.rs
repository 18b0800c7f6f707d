//! Half-open time windows and the spacing tests built on them.

use std::fmt;

use crate::error::ScheduleError;
use crate::time::Minute;

/// A window `[start, end)` on the minute clock.
///
/// Construction through [`TimeWindow::new`] rejects `end < start`; an
/// empty window (`start == end`) is allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    start: Minute,
    end: Minute,
}

impl TimeWindow {
    /// Build a window, failing if `end` precedes `start`.
    pub fn new(start: Minute, end: Minute) -> Result<Self, ScheduleError> {
        if end < start {
            return Err(ScheduleError::MalformedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a window from a start and a non-negative length in minutes.
    pub fn with_duration(start: Minute, minutes: i64) -> Result<Self, ScheduleError> {
        Self::new(start, start + minutes)
    }

    /// First minute of the window.
    pub fn start(&self) -> Minute {
        self.start
    }

    /// First minute after the window.
    pub fn end(&self) -> Minute {
        self.end
    }

    /// Length in minutes.
    pub fn duration(&self) -> i64 {
        self.end.minutes_since(self.start)
    }

    /// `start <= t < end`.
    pub fn contains(&self, t: Minute) -> bool {
        self.start <= t && t < self.end
    }

    /// True if the windows share any minute. Touching windows do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }

    /// Minutes between the two windows, `0` if they overlap or touch.
    pub fn separation(&self, other: &TimeWindow) -> i64 {
        if self.end <= other.start {
            other.start.minutes_since(self.end)
        } else if other.end <= self.start {
            self.start.minutes_since(other.end)
        } else {
            0
        }
    }

    /// True if the windows overlap or sit closer than `min_gap` minutes.
    pub fn conflicts_with(&self, other: &TimeWindow, min_gap: i64) -> bool {
        self.overlaps(other) || self.separation(other) < min_gap
    }

    /// Widen the window by `buffer` minutes on each side.
    pub fn padded(&self, buffer: i64) -> TimeWindow {
        TimeWindow {
            start: self.start - buffer,
            end: self.end + buffer,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
