//! Half-open time intervals.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A half-open time interval `[start, end)` in seconds.
///
/// A segment with `end <= start` covers no time at all and is treated as
/// empty by every container in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Segment {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Interval length in seconds. Negative when `end < start`.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// True when the interval covers no time.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True when the two intervals share a non-empty overlap.
    pub fn intersects(&self, other: &Segment) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }

    /// Overlapping part of the two intervals, `None` when it is empty.
    pub fn intersection(&self, other: &Segment) -> Option<Segment> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(Segment::new(start, end))
        } else {
            None
        }
    }

    /// Translate both bounds by `offset` seconds.
    pub fn shift(&self, offset: f64) -> Segment {
        Segment::new(self.start + offset, self.end + offset)
    }

    /// Total order by `(start, end)`.
    pub fn order(&self, other: &Segment) -> Ordering {
        self.start
            .total_cmp(&other.start)
            .then(self.end.total_cmp(&other.end))
    }
}
