//! Ordered segment sets tagged with a recording identifier.

use crate::Segment;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// An ordered set of segments over one recording.
///
/// Segments are kept sorted by `(start, end)` and stored once each; empty
/// segments are silently ignored on insertion. Overlaps between distinct
/// segments are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    uri: String,
    segments: Vec<Segment>,
}

impl Timeline {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            segments: Vec::new(),
        }
    }

    pub fn from_segments(
        uri: impl Into<String>,
        segments: impl IntoIterator<Item = Segment>,
    ) -> Self {
        let mut timeline = Self::new(uri);
        for segment in segments {
            timeline.add(segment);
        }
        timeline
    }

    /// Recording this timeline belongs to.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Insert a segment, keeping the set sorted and duplicate-free.
    /// Empty segments are ignored.
    pub fn add(&mut self, segment: Segment) {
        if segment.is_empty() {
            return;
        }
        let at = self
            .segments
            .partition_point(|existing| existing.order(&segment) == Ordering::Less);
        if self.segments.get(at) == Some(&segment) {
            return;
        }
        self.segments.insert(at, segment);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Keep only the parts of each segment overlapping `region`.
    pub fn crop(&self, region: &Segment) -> Timeline {
        let cropped = self
            .segments
            .iter()
            .filter_map(|segment| segment.intersection(region));
        Timeline::from_segments(self.uri.clone(), cropped)
    }

    /// Smallest segment covering the whole timeline, `None` when empty.
    pub fn extent(&self) -> Option<Segment> {
        let start = self.segments.first()?.start;
        let end = self
            .segments
            .iter()
            .map(|segment| segment.end)
            .fold(f64::NEG_INFINITY, f64::max);
        Some(Segment::new(start, end))
    }

    /// Total covered duration in seconds, counting overlaps once.
    pub fn duration(&self) -> f64 {
        let mut total = 0.0;
        let mut covered = f64::NEG_INFINITY;
        for segment in &self.segments {
            if segment.end > covered {
                total += segment.end - segment.start.max(covered);
                covered = segment.end;
            }
        }
        total
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
