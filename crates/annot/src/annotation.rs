//! Speaker-labelled turns over one recording.

use crate::{Segment, Timeline};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One labelled turn: a segment, a track index separating co-occurring
/// turns, and a speaker label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub segment: Segment,
    pub track: usize,
    pub label: String,
}

/// A mapping from `(segment, track)` to a speaker label over one recording.
///
/// Turns are kept sorted by `(segment, track)`. Reinserting an existing
/// `(segment, track)` key replaces its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    uri: String,
    turns: Vec<Turn>,
}

impl Annotation {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            turns: Vec::new(),
        }
    }

    /// Recording this annotation belongs to.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Record a labelled turn. Empty segments are ignored.
    pub fn insert(&mut self, segment: Segment, track: usize, label: impl Into<String>) {
        if segment.is_empty() {
            return;
        }
        let at = self.turns.partition_point(|turn| {
            turn.segment
                .order(&segment)
                .then(turn.track.cmp(&track))
                == Ordering::Less
        });
        if let Some(turn) = self.turns.get_mut(at) {
            if turn.segment == segment && turn.track == track {
                turn.label = label.into();
                return;
            }
        }
        self.turns.insert(
            at,
            Turn {
                segment,
                track,
                label: label.into(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Sorted, deduplicated speaker labels.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.turns.iter().map(|turn| turn.label.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Turn segments as a timeline, duplicates collapsed.
    pub fn timeline(&self) -> Timeline {
        Timeline::from_segments(self.uri.clone(), self.turns.iter().map(|turn| turn.segment))
    }

    /// Keep only the parts of each turn overlapping `region`, preserving
    /// track indices and labels.
    pub fn crop(&self, region: &Segment) -> Annotation {
        let mut cropped = Annotation::new(self.uri.clone());
        for turn in &self.turns {
            if let Some(segment) = turn.segment.intersection(region) {
                cropped.insert(segment, turn.track, turn.label.as_str());
            }
        }
        cropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation() -> Annotation {
        let mut annotation = Annotation::new("REC01");
        annotation.insert(Segment::new(20.0, 25.0), 1, "BOB");
        annotation.insert(Segment::new(5.0, 15.0), 0, "ALICE");
        annotation.insert(Segment::new(30.0, 40.0), 2, "ALICE");
        annotation
    }

    #[test]
    fn insert_keeps_turns_sorted() {
        let annotation = annotation();
        let tracks: Vec<usize> = annotation.iter().map(|turn| turn.track).collect();
        assert_eq!(tracks, vec![0, 1, 2]);
    }

    #[test]
    fn insert_ignores_empty_segments() {
        let mut annotation = Annotation::new("REC01");
        annotation.insert(Segment::new(5.0, 5.0), 0, "ALICE");
        assert!(annotation.is_empty());
    }

    #[test]
    fn insert_replaces_label_for_existing_key() {
        let mut annotation = Annotation::new("REC01");
        annotation.insert(Segment::new(0.0, 1.0), 0, "ALICE");
        annotation.insert(Segment::new(0.0, 1.0), 0, "BOB");
        assert_eq!(annotation.len(), 1);
        assert_eq!(annotation.turns()[0].label, "BOB");
    }

    #[test]
    fn labels_are_sorted_and_unique() {
        assert_eq!(annotation().labels(), vec!["ALICE", "BOB"]);
    }

    #[test]
    fn timeline_collects_turn_segments() {
        let timeline = annotation().timeline();
        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.uri(), "REC01");
    }

    #[test]
    fn crop_trims_turns_and_keeps_tracks() {
        let cropped = annotation().crop(&Segment::new(10.0, 35.0));
        assert_eq!(
            cropped.turns(),
            &[
                Turn {
                    segment: Segment::new(10.0, 15.0),
                    track: 0,
                    label: "ALICE".to_string(),
                },
                Turn {
                    segment: Segment::new(20.0, 25.0),
                    track: 1,
                    label: "BOB".to_string(),
                },
                Turn {
                    segment: Segment::new(30.0, 35.0),
                    track: 2,
                    label: "ALICE".to_string(),
                },
            ]
        );
    }

    #[test]
    fn crop_drops_disjoint_turns() {
        let cropped = annotation().crop(&Segment::new(0.0, 5.0));
        assert!(cropped.is_empty());
    }
}
