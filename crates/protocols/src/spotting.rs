//! Session-split mix-headset speaker-spotting protocol.
//!
//! Long recordings are split into shorter evaluable sessions. Annotation
//! files keep absolute offsets into the full recording; every item also
//! carries a session-relative `crop` twin re-based to start at zero, keyed
//! by the session identifier instead of the recording uri.

use crate::error::Result;
use crate::loader::{self, Grouped, ModelRow, Session, Sessions, SpottingTrialRow, TurnRow};
use crate::record::{DiarizationItem, EnrolmentItem, TrialItem, DATABASE};
use crate::{files, schema, SpeakerDerivation, Subset};
use odessa_annot::{Annotation, Segment, Timeline};
use std::path::PathBuf;

/// Audio channel suffix appended to every session recording uri.
pub const MIX_HEADSET_SUFFIX: &str = ".Mix-Headset";

/// Session-split speaker-spotting protocol over the mix-headset channel.
#[derive(Debug, Clone)]
pub struct SpeakerSpotting {
    data_dir: PathBuf,
    derivation: SpeakerDerivation,
}

impl SpeakerSpotting {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_derivation(data_dir, SpeakerDerivation::default())
    }

    /// Protocol with an explicit model-id-to-speaker derivation.
    pub fn with_derivation(data_dir: impl Into<PathBuf>, derivation: SpeakerDerivation) -> Self {
        Self {
            data_dir: data_dir.into(),
            derivation,
        }
    }

    /// Diarization items for `subset`, one per session, in session file
    /// order.
    ///
    /// A session with no reference turns is skipped with a warning during
    /// iteration.
    pub fn subset(&self, subset: Subset) -> Result<SpottingIter> {
        let turns = loader::load_turn_groups(
            &files::spotting_reference(&self.data_dir, subset),
            schema::session_rttm(),
            &["session_id"],
            "speaker",
        )?;
        let sessions = loader::load_sessions(&files::spotting_sessions(&self.data_dir, subset))?;
        Ok(SpottingIter {
            sessions: sessions.into_iter(),
            turns,
        })
    }

    pub fn train(&self) -> Result<SpottingIter> {
        self.subset(Subset::Train)
    }

    pub fn dev(&self) -> Result<SpottingIter> {
        self.subset(Subset::Dev)
    }

    pub fn test(&self) -> Result<SpottingIter> {
        self.subset(Subset::Test)
    }

    /// Enrolment items for `subset`, one per listed model, in model file
    /// order.
    ///
    /// A model whose session is unknown, or with no enrolment turns, is
    /// skipped with a warning during iteration.
    pub fn enrolments(&self, subset: Subset) -> Result<SpottingEnrolments> {
        let turns = loader::load_turn_groups(
            &files::spotting_enrolment(&self.data_dir, subset),
            schema::model_rttm(),
            &["session_id", "model_id"],
            "model_id",
        )?;
        let sessions = loader::load_sessions(&files::spotting_sessions(&self.data_dir, subset))?;
        let models = loader::load_models(&files::spotting_models(&self.data_dir, subset))?;
        Ok(SpottingEnrolments {
            models: models.into_iter(),
            sessions,
            turns,
        })
    }

    pub fn train_enrolments(&self) -> Result<SpottingEnrolments> {
        self.enrolments(Subset::Train)
    }

    pub fn dev_enrolments(&self) -> Result<SpottingEnrolments> {
        self.enrolments(Subset::Dev)
    }

    pub fn test_enrolments(&self) -> Result<SpottingEnrolments> {
        self.enrolments(Subset::Test)
    }

    /// Trial items for `subset`, in trial file order.
    ///
    /// Each trial runs a model over a whole session. A trial whose session
    /// is unknown, or whose model has no speaker mapping, is skipped with
    /// a warning. A claimed speaker with no turns in the session yields an
    /// empty reference, not a skip.
    pub fn trials(&self, subset: Subset) -> Result<SpottingTrials> {
        let turns = loader::load_turn_groups(
            &files::spotting_reference(&self.data_dir, subset),
            schema::session_rttm(),
            &["session_id", "speaker"],
            "speaker",
        )?;
        let sessions = loader::load_sessions(&files::spotting_sessions(&self.data_dir, subset))?;
        let trials = loader::load_spotting_trials(&files::spotting_trials(&self.data_dir, subset))?;
        Ok(SpottingTrials {
            trials: trials.into_iter(),
            sessions,
            turns,
            derivation: self.derivation.clone(),
        })
    }

    pub fn train_trials(&self) -> Result<SpottingTrials> {
        self.trials(Subset::Train)
    }

    pub fn dev_trials(&self) -> Result<SpottingTrials> {
        self.trials(Subset::Dev)
    }

    pub fn test_trials(&self) -> Result<SpottingTrials> {
        self.trials(Subset::Test)
    }
}

fn session_uri(session: &Session) -> String {
    format!("{}{}", session.uri, MIX_HEADSET_SUFFIX)
}

/// Absolute and session-relative annotations built in one pass, so both
/// share track indices.
fn session_annotations(
    session: &Session,
    uri: &str,
    turns: &[TurnRow],
) -> (Annotation, Annotation) {
    let mut absolute = Annotation::new(uri);
    let mut relative = Annotation::new(session.session_id.as_str());
    let mut track = 0;
    for turn in turns {
        let Some(segment) = loader::turn_segment(turn, uri) else {
            continue;
        };
        absolute.insert(segment, track, turn.label.as_str());
        relative.insert(segment.shift(-session.start), track, turn.label.as_str());
        track += 1;
    }
    (absolute, relative)
}

/// Absolute and session-relative timelines built in one pass.
fn session_timelines(session: &Session, uri: &str, turns: &[TurnRow]) -> (Timeline, Timeline) {
    let mut absolute = Timeline::new(uri);
    let mut relative = Timeline::new(session.session_id.as_str());
    for turn in turns {
        let Some(segment) = loader::turn_segment(turn, uri) else {
            continue;
        };
        absolute.add(segment);
        relative.add(segment.shift(-session.start));
    }
    (absolute, relative)
}

/// Lazy diarization-item sequence, one item per session.
#[derive(Debug)]
pub struct SpottingIter {
    sessions: std::vec::IntoIter<Session>,
    turns: Grouped<TurnRow>,
}

impl Iterator for SpottingIter {
    type Item = DiarizationItem;

    fn next(&mut self) -> Option<DiarizationItem> {
        loop {
            let session = self.sessions.next()?;
            let uri = session_uri(&session);
            let turns = match self.turns.get(&[&session.session_id]) {
                Ok(turns) => turns,
                Err(error) => {
                    tracing::warn!(
                        session_id = %session.session_id,
                        %error,
                        "skipping session without reference turns"
                    );
                    continue;
                }
            };
            let (annotation, crop_annotation) = session_annotations(&session, &uri, turns);
            let annotated =
                Timeline::from_segments(uri.clone(), [Segment::new(session.start, session.end)]);
            let crop_annotated = Timeline::from_segments(
                session.session_id.clone(),
                [Segment::new(0.0, session.end - session.start)],
            );
            return Some(DiarizationItem {
                database: DATABASE.to_string(),
                uri,
                annotated,
                annotation,
                crop: Some(Box::new(DiarizationItem {
                    database: DATABASE.to_string(),
                    uri: session.session_id,
                    annotated: crop_annotated,
                    annotation: crop_annotation,
                    crop: None,
                })),
            });
        }
    }
}

/// Lazy enrolment-item sequence, one item per listed model.
#[derive(Debug)]
pub struct SpottingEnrolments {
    models: std::vec::IntoIter<ModelRow>,
    sessions: Sessions,
    turns: Grouped<TurnRow>,
}

impl Iterator for SpottingEnrolments {
    type Item = EnrolmentItem;

    fn next(&mut self) -> Option<EnrolmentItem> {
        loop {
            let model = self.models.next()?;
            let Some(session) = self.sessions.get(&model.session_id) else {
                tracing::warn!(
                    model_id = %model.model_id,
                    session_id = %model.session_id,
                    "skipping model with unknown session"
                );
                continue;
            };
            let turns = match self.turns.get(&[&model.session_id, &model.model_id]) {
                Ok(turns) => turns,
                Err(error) => {
                    tracing::warn!(
                        model_id = %model.model_id,
                        %error,
                        "skipping model without enrolment turns"
                    );
                    continue;
                }
            };
            let uri = session_uri(session);
            let (enrol_with, crop_enrol_with) = session_timelines(session, &uri, turns);
            return Some(EnrolmentItem {
                database: DATABASE.to_string(),
                uri,
                model_id: model.model_id.clone(),
                enrol_with,
                crop: Some(Box::new(EnrolmentItem {
                    database: DATABASE.to_string(),
                    uri: session.session_id.clone(),
                    model_id: model.model_id,
                    enrol_with: crop_enrol_with,
                    crop: None,
                })),
            });
        }
    }
}

/// Lazy trial-item sequence, in trial file order.
#[derive(Debug)]
pub struct SpottingTrials {
    trials: std::vec::IntoIter<SpottingTrialRow>,
    sessions: Sessions,
    turns: Grouped<TurnRow>,
    derivation: SpeakerDerivation,
}

impl Iterator for SpottingTrials {
    type Item = TrialItem;

    fn next(&mut self) -> Option<TrialItem> {
        loop {
            let trial = self.trials.next()?;
            let Some(session) = self.sessions.get(&trial.session_id) else {
                tracing::warn!(
                    model_id = %trial.model_id,
                    session_id = %trial.session_id,
                    "skipping trial with unknown session"
                );
                continue;
            };
            let Some(speaker) = self.derivation.speaker_for(&trial.model_id) else {
                tracing::warn!(
                    model_id = %trial.model_id,
                    "skipping trial without speaker mapping"
                );
                continue;
            };
            let uri = session_uri(session);
            // Absent turn group: the claimed speaker never talks in this
            // session, which is a legitimate impostor trial.
            let turns = self
                .turns
                .get(&[&trial.session_id, speaker])
                .unwrap_or_default();
            let (reference, crop_reference) = session_timelines(session, &uri, turns);
            let try_with = Segment::new(session.start, session.end);
            let crop_try_with = Segment::new(0.0, session.end - session.start);
            return Some(TrialItem {
                database: DATABASE.to_string(),
                uri,
                model_id: trial.model_id.clone(),
                try_with,
                reference,
                crop: Some(Box::new(TrialItem {
                    database: DATABASE.to_string(),
                    uri: session.session_id.clone(),
                    model_id: trial.model_id,
                    try_with: crop_try_with,
                    reference: crop_reference,
                    crop: None,
                })),
            });
        }
    }
}
