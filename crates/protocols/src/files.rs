//! On-disk locations of the annotation files, per protocol generation.
//!
//! File names are fixed corpus conventions. Only the data directory they
//! hang off is configurable, one directory per protocol instance.

use crate::Subset;
use std::path::{Path, PathBuf};

/// `{stem}.{tag}.uem` at the top of the data directory.
pub(crate) fn diarization_uem(data_dir: &Path, stem: &str, subset: Subset) -> PathBuf {
    data_dir.join(format!("{stem}.{}.uem", subset.tag()))
}

/// `{stem}.{tag}.mdtm` at the top of the data directory.
pub(crate) fn diarization_mdtm(data_dir: &Path, stem: &str, subset: Subset) -> PathBuf {
    data_dir.join(format!("{stem}.{}.mdtm", subset.tag()))
}

/// Session-split reference turns, with absolute offsets kept.
pub(crate) fn spotting_reference(data_dir: &Path, subset: Subset) -> PathBuf {
    data_dir
        .join("llss")
        .join("AMI.split_references")
        .join(format!(
            "AMI.p1mh.splitSessionsWithOffset.{}.rttm",
            subset.tag()
        ))
}

/// Session-to-recording mapping with session bounds.
pub(crate) fn spotting_sessions(data_dir: &Path, subset: Subset) -> PathBuf {
    data_dir
        .join("llss")
        .join("AMI.split_references")
        .join(format!(
            "AMI.p1mh.splitSessionsMapping.{}.lst",
            subset.tag()
        ))
}

/// Enrolment turns for the 60-second enrolment condition.
pub(crate) fn spotting_enrolment(data_dir: &Path, subset: Subset) -> PathBuf {
    spotting_subset_dir(data_dir, subset).join(format!(
        "AMI.p1mh.enrollment_60sec.enrollment.{}.rttm",
        subset.tag()
    ))
}

/// Speaker model list for the 60-second enrolment condition.
pub(crate) fn spotting_models(data_dir: &Path, subset: Subset) -> PathBuf {
    spotting_subset_dir(data_dir, subset).join(format!(
        "AMI.p1mh.enrollment_60sec.speakerModels.{}.lst",
        subset.tag()
    ))
}

/// Low-latency speaker spotting trial list.
pub(crate) fn spotting_trials(data_dir: &Path, subset: Subset) -> PathBuf {
    spotting_subset_dir(data_dir, subset).join(format!(
        "AMI.p1mh.enrollment_60sec.LLSS.{}.trl",
        subset.tag()
    ))
}

fn spotting_subset_dir(data_dir: &Path, subset: Subset) -> PathBuf {
    data_dir.join("llss").join("AMI.p1mh").join(subset.tag())
}

/// Uri-keyed reference turns for verification.
pub(crate) fn verification_reference(data_dir: &Path, subset: Subset) -> PathBuf {
    data_dir.join("verification").join(format!(
        "AMI.verification.reference.{}.rttm",
        subset.tag()
    ))
}

/// Verification enrolment list.
pub(crate) fn verification_enrolments(data_dir: &Path, subset: Subset) -> PathBuf {
    data_dir.join("verification").join(format!(
        "AMI.verification.enrolment.{}.lst",
        subset.tag()
    ))
}

/// Verification trial list with target flags.
pub(crate) fn verification_trials(data_dir: &Path, subset: Subset) -> PathBuf {
    data_dir
        .join("verification")
        .join(format!("AMI.verification.trials.{}.lst", subset.tag()))
}
