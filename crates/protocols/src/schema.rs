//! Column layouts of the corpus annotation files.
//!
//! One named schema per file layout. The layouts are maintained alongside
//! the files themselves; keeping them explicit here rather than implied by
//! parsing code is what lets two generations of trial files coexist.

use odessa_table::{Column, Schema};

/// UEM annotated-region files: `uri channel start end`.
pub fn uem() -> Schema {
    Schema::new([
        Column::text("uri"),
        Column::text("channel"),
        Column::number("start"),
        Column::number("end"),
    ])
}

/// MDTM speaker-turn files:
/// `uri channel start duration modality confidence gender speaker`.
pub fn mdtm() -> Schema {
    Schema::new([
        Column::text("uri"),
        Column::text("channel"),
        Column::number("start"),
        Column::number("duration"),
        Column::text("modality"),
        Column::text("confidence"),
        Column::text("gender"),
        Column::text("speaker"),
    ])
}

/// RTTM speaker-turn files keyed by session identifier:
/// `type session_id channel start duration ortho stype speaker conf slat`.
pub fn session_rttm() -> Schema {
    rttm(Column::text("session_id"), Column::text("speaker"))
}

/// RTTM enrolment files keyed by session, with the model identifier in
/// the speaker position.
pub fn model_rttm() -> Schema {
    rttm(Column::text("session_id"), Column::text("model_id"))
}

/// RTTM speaker-turn files keyed by recording uri.
pub fn uri_rttm() -> Schema {
    rttm(Column::text("uri"), Column::text("speaker"))
}

fn rttm(key: Column, label: Column) -> Schema {
    Schema::new([
        Column::text("type"),
        key,
        Column::text("channel"),
        Column::number("start"),
        Column::number("duration"),
        Column::text("ortho"),
        Column::text("stype"),
        label,
        Column::text("conf"),
        Column::text("slat"),
    ])
}

/// Session mapping files: `session_id uri start end`.
pub fn sessions() -> Schema {
    Schema::new([
        Column::text("session_id"),
        Column::text("uri"),
        Column::number("start"),
        Column::number("end"),
    ])
}

/// Speaker model lists: `model_id session_id`.
pub fn models() -> Schema {
    Schema::new([Column::text("model_id"), Column::text("session_id")])
}

/// Session-keyed trial lists: `model_id session_id start trial`.
pub fn spotting_trials() -> Schema {
    Schema::new([
        Column::text("model_id"),
        Column::text("session_id"),
        Column::number("start"),
        Column::text("trial"),
    ])
}

/// Verification enrolment lists: `uri start duration model_id`.
pub fn enrolments() -> Schema {
    Schema::new([
        Column::text("uri"),
        Column::number("start"),
        Column::number("duration"),
        Column::text("model_id"),
    ])
}

/// Uri-keyed trial lists with explicit target flags:
/// `model_id uri start end target first total`.
pub fn verification_trials() -> Schema {
    Schema::new([
        Column::text("model_id"),
        Column::text("uri"),
        Column::number("start"),
        Column::number("end"),
        Column::text("target"),
        Column::number("first"),
        Column::number("total"),
    ])
}
