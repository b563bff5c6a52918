//! Speaker-verification protocol keyed directly by recording uri.
//!
//! Unlike the session-split generation, nothing is re-based: trials name
//! their recording and test interval outright, and every trial carries an
//! explicit target/nontarget flag.

use crate::error::Result;
use crate::loader::{self, EnrolmentGroup, Grouped, TurnRow, VerificationTrialRow};
use crate::record::{EnrolmentItem, TrialItem, DATABASE};
use crate::{files, schema, SpeakerDerivation, Subset};
use odessa_annot::Timeline;
use std::path::PathBuf;

/// Uri-keyed speaker-verification protocol.
#[derive(Debug, Clone)]
pub struct SpeakerVerification {
    data_dir: PathBuf,
    derivation: SpeakerDerivation,
}

impl SpeakerVerification {
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

    /// Enrolment items for `subset`, one per model, in first-appearance
    /// order of the enrolment list.
    pub fn enrolments(&self, subset: Subset) -> Result<VerificationEnrolments> {
        let groups =
            loader::load_enrolment_groups(&files::verification_enrolments(&self.data_dir, subset))?;
        Ok(VerificationEnrolments {
            groups: groups.into_iter(),
        })
    }

    pub fn train_enrolments(&self) -> Result<VerificationEnrolments> {
        self.enrolments(Subset::Train)
    }

    pub fn dev_enrolments(&self) -> Result<VerificationEnrolments> {
        self.enrolments(Subset::Dev)
    }

    pub fn test_enrolments(&self) -> Result<VerificationEnrolments> {
        self.enrolments(Subset::Test)
    }

    /// Trial items for `subset`, in trial file order.
    ///
    /// Invalid target flags fail here. For target trials the reference is
    /// the claimed speaker's turns cropped to the test interval; a target
    /// trial whose speaker has no turns on the recording is skipped with a
    /// warning. Nontarget trials always carry an empty reference.
    pub fn trials(&self, subset: Subset) -> Result<VerificationTrials> {
        let turns = loader::load_turn_groups(
            &files::verification_reference(&self.data_dir, subset),
            schema::uri_rttm(),
            &["uri", "speaker"],
            "speaker",
        )?;
        let trials =
            loader::load_verification_trials(&files::verification_trials(&self.data_dir, subset))?;
        Ok(VerificationTrials {
            trials: trials.into_iter(),
            turns,
            derivation: self.derivation.clone(),
        })
    }

    pub fn train_trials(&self) -> Result<VerificationTrials> {
        self.trials(Subset::Train)
    }

    pub fn dev_trials(&self) -> Result<VerificationTrials> {
        self.trials(Subset::Dev)
    }

    pub fn test_trials(&self) -> Result<VerificationTrials> {
        self.trials(Subset::Test)
    }
}

/// Lazy enrolment-item sequence, one item per model.
#[derive(Debug)]
pub struct VerificationEnrolments {
    groups: std::vec::IntoIter<EnrolmentGroup>,
}

impl Iterator for VerificationEnrolments {
    type Item = EnrolmentItem;

    fn next(&mut self) -> Option<EnrolmentItem> {
        let group = self.groups.next()?;
        let enrol_with = loader::turns_to_timeline(&group.uri, &group.turns);
        Some(EnrolmentItem {
            database: DATABASE.to_string(),
            uri: group.uri,
            model_id: group.model_id,
            enrol_with,
            crop: None,
        })
    }
}

/// Lazy trial-item sequence, in trial file order.
#[derive(Debug)]
pub struct VerificationTrials {
    trials: std::vec::IntoIter<VerificationTrialRow>,
    turns: Grouped<TurnRow>,
    derivation: SpeakerDerivation,
}

impl Iterator for VerificationTrials {
    type Item = TrialItem;

    fn next(&mut self) -> Option<TrialItem> {
        loop {
            let trial = self.trials.next()?;
            if !trial.target {
                let reference = Timeline::new(trial.uri.as_str());
                return Some(TrialItem {
                    database: DATABASE.to_string(),
                    uri: trial.uri,
                    model_id: trial.model_id,
                    try_with: trial.try_with,
                    reference,
                    crop: None,
                });
            }
            let Some(speaker) = self.derivation.speaker_for(&trial.model_id) else {
                tracing::warn!(
                    model_id = %trial.model_id,
                    "skipping trial without speaker mapping"
                );
                continue;
            };
            let turns = match self.turns.get(&[&trial.uri, speaker]) {
                Ok(turns) => turns,
                Err(error) => {
                    tracing::warn!(
                        uri = %trial.uri,
                        model_id = %trial.model_id,
                        %error,
                        "skipping target trial without reference turns"
                    );
                    continue;
                }
            };
            let reference =
                loader::turns_to_timeline(&trial.uri, turns).crop(&trial.try_with);
            return Some(TrialItem {
                database: DATABASE.to_string(),
                uri: trial.uri,
                model_id: trial.model_id,
                try_with: trial.try_with,
                reference,
                crop: None,
            });
        }
    }
}
