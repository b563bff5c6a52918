//! Item records yielded to the evaluation framework.

use odessa_annot::{Annotation, Segment, Timeline};
use serde::{Deserialize, Serialize};

/// Database name carried by every record.
pub const DATABASE: &str = "AMI";

/// One diarization item: a recording with its reliable regions and its
/// reference speaker turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiarizationItem {
    pub database: String,
    pub uri: String,
    /// Regions where the reference annotation is reliable.
    pub annotated: Timeline,
    /// Reference speaker turns.
    pub annotation: Annotation,
    /// Session-relative twin re-based to start at zero, present in the
    /// session-split generation.
    #[serde(default)]
    pub crop: Option<Box<DiarizationItem>>,
}

/// One enrolment item: the audio intervals a speaker model is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrolmentItem {
    pub database: String,
    pub uri: String,
    pub model_id: String,
    /// Intervals the model is enrolled on.
    pub enrol_with: Timeline,
    /// Session-relative twin re-based to start at zero, present in the
    /// session-split generation.
    #[serde(default)]
    pub crop: Option<Box<EnrolmentItem>>,
}

/// One trial item: a model tried against a test interval of a recording.
///
/// An empty `reference` means the claimed speaker never talks inside
/// `try_with`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialItem {
    pub database: String,
    pub uri: String,
    pub model_id: String,
    /// Interval of the recording the trial runs over.
    pub try_with: Segment,
    /// Intervals inside `try_with` where the claimed speaker talks.
    pub reference: Timeline,
    /// Session-relative twin re-based to start at zero, present in the
    /// session-split generation.
    #[serde(default)]
    pub crop: Option<Box<TrialItem>>,
}
