//! Shared loading and record-building helpers for all protocol families.
//!
//! Loading is eager and strict: files are read, parsed, grouped and
//! converted to typed rows before any item is assembled, so file-level
//! and row-level problems surface at the entry point. Assembly itself is
//! infallible; entity-level gaps are skipped with a warning (or treated
//! as evidence of absence, where a family defines them that way).

use crate::error::{ProtocolError, Result};
use crate::schema;
use odessa_annot::{Annotation, Segment, Timeline};
use odessa_table::{Schema, Table, TableError};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

/// One speaker turn row: interval start, raw duration and label.
#[derive(Debug, Clone)]
pub(crate) struct TurnRow {
    pub start: f64,
    pub duration: f64,
    pub label: String,
}

/// A session: a `[start, end)` sub-region of a longer recording,
/// evaluated as a recording of its own.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub session_id: String,
    pub uri: String,
    pub start: f64,
    pub end: f64,
}

/// Sessions in file order, with lookup by session identifier.
#[derive(Debug)]
pub(crate) struct Sessions {
    in_order: Vec<Session>,
    by_id: HashMap<String, usize>,
}

impl Sessions {
    pub fn get(&self, session_id: &str) -> Option<&Session> {
        self.by_id
            .get(session_id)
            .map(|&index| &self.in_order[index])
    }
}

impl IntoIterator for Sessions {
    type Item = Session;
    type IntoIter = std::vec::IntoIter<Session>;

    fn into_iter(self) -> Self::IntoIter {
        self.in_order.into_iter()
    }
}

/// Typed values grouped by key columns, preserving first-appearance key
/// order and file order within each group.
#[derive(Debug)]
pub(crate) struct Grouped<T> {
    order: Vec<Vec<String>>,
    map: HashMap<Vec<String>, Vec<T>>,
}

impl<T> Grouped<T> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            map: HashMap::new(),
        }
    }

    fn insert(&mut self, key: Vec<String>, value: T) {
        match self.map.entry(key) {
            Entry::Occupied(mut entry) => entry.get_mut().push(value),
            Entry::Vacant(entry) => {
                self.order.push(entry.key().clone());
                entry.insert(vec![value]);
            }
        }
    }

    /// Values sharing `key`, or [`TableError::MissingGroup`] when no row
    /// carried that key. Callers decide whether a missing group is worth
    /// a warning or is expected absence.
    pub fn get(&self, key: &[&str]) -> std::result::Result<&[T], TableError> {
        let owned: Vec<String> = key.iter().map(|part| (*part).to_string()).collect();
        match self.map.get(&owned) {
            Some(values) => Ok(values),
            None => Err(TableError::MissingGroup {
                key: owned.join(" "),
            }),
        }
    }

    /// Keys in first-appearance order.
    pub fn keys(&self) -> impl Iterator<Item = &[String]> {
        self.order.iter().map(Vec::as_slice)
    }
}

/// Load UEM regions grouped by uri.
pub(crate) fn load_uem(path: &Path) -> Result<Grouped<Segment>> {
    let grouped = Table::read(path, schema::uem())?.group_by(&["uri"])?;
    let mut regions = Grouped::new();
    for (key, rows) in grouped.iter() {
        for row in rows {
            let segment = Segment::new(
                grouped.number(row, "start")?,
                grouped.number(row, "end")?,
            );
            regions.insert(key.to_vec(), segment);
        }
    }
    Ok(regions)
}

/// Load a turn table grouped by `key_columns`; `label_column` supplies
/// each turn's label.
pub(crate) fn load_turn_groups(
    path: &Path,
    schema: Schema,
    key_columns: &[&str],
    label_column: &str,
) -> Result<Grouped<TurnRow>> {
    let grouped = Table::read(path, schema)?.group_by(key_columns)?;
    let mut turns = Grouped::new();
    for (key, rows) in grouped.iter() {
        for row in rows {
            turns.insert(
                key.to_vec(),
                TurnRow {
                    start: grouped.number(row, "start")?,
                    duration: grouped.number(row, "duration")?,
                    label: grouped.text(row, label_column)?.to_string(),
                },
            );
        }
    }
    Ok(turns)
}

/// Load the session mapping in file order.
pub(crate) fn load_sessions(path: &Path) -> Result<Sessions> {
    let table = Table::read(path, schema::sessions())?;
    let mut in_order = Vec::with_capacity(table.len());
    let mut by_id = HashMap::new();
    for row in table.rows() {
        let session = Session {
            session_id: table.text(row, "session_id")?.to_string(),
            uri: table.text(row, "uri")?.to_string(),
            start: table.number(row, "start")?,
            end: table.number(row, "end")?,
        };
        by_id.entry(session.session_id.clone()).or_insert(in_order.len());
        in_order.push(session);
    }
    Ok(Sessions { in_order, by_id })
}

/// One speaker model list row.
#[derive(Debug, Clone)]
pub(crate) struct ModelRow {
    pub model_id: String,
    pub session_id: String,
}

/// Load the speaker model list in file order.
pub(crate) fn load_models(path: &Path) -> Result<Vec<ModelRow>> {
    let table = Table::read(path, schema::models())?;
    let mut models = Vec::with_capacity(table.len());
    for row in table.rows() {
        models.push(ModelRow {
            model_id: table.text(row, "model_id")?.to_string(),
            session_id: table.text(row, "session_id")?.to_string(),
        });
    }
    Ok(models)
}

/// One session-keyed trial row. The model and session are all that
/// identifies the trial; the remaining columns are bookkeeping.
#[derive(Debug, Clone)]
pub(crate) struct SpottingTrialRow {
    pub model_id: String,
    pub session_id: String,
}

/// Load the session-keyed trial list in file order.
pub(crate) fn load_spotting_trials(path: &Path) -> Result<Vec<SpottingTrialRow>> {
    let table = Table::read(path, schema::spotting_trials())?;
    let mut trials = Vec::with_capacity(table.len());
    for row in table.rows() {
        trials.push(SpottingTrialRow {
            model_id: table.text(row, "model_id")?.to_string(),
            session_id: table.text(row, "session_id")?.to_string(),
        });
    }
    Ok(trials)
}

/// One verification enrolment group: a speaker model with its turns,
/// all on the same recording.
#[derive(Debug, Clone)]
pub(crate) struct EnrolmentGroup {
    pub model_id: String,
    pub uri: String,
    pub turns: Vec<TurnRow>,
}

/// Load enrolment rows grouped by model, in first-appearance order.
pub(crate) fn load_enrolment_groups(path: &Path) -> Result<Vec<EnrolmentGroup>> {
    let grouped = Table::read(path, schema::enrolments())?.group_by(&["model_id"])?;
    let mut groups = Vec::with_capacity(grouped.len());
    for (key, rows) in grouped.iter() {
        let Some(first) = rows.first() else { continue };
        let model_id = key[0].clone();
        let uri = grouped.text(first, "uri")?.to_string();
        let mut turns = Vec::with_capacity(rows.len());
        for row in rows {
            turns.push(TurnRow {
                start: grouped.number(row, "start")?,
                duration: grouped.number(row, "duration")?,
                label: model_id.clone(),
            });
        }
        groups.push(EnrolmentGroup {
            model_id,
            uri,
            turns,
        });
    }
    Ok(groups)
}

/// One uri-keyed trial row with its validated target flag.
#[derive(Debug, Clone)]
pub(crate) struct VerificationTrialRow {
    pub model_id: String,
    pub uri: String,
    pub try_with: Segment,
    pub target: bool,
}

/// Load the uri-keyed trial list in file order, validating every target
/// flag up front.
pub(crate) fn load_verification_trials(path: &Path) -> Result<Vec<VerificationTrialRow>> {
    let table = Table::read(path, schema::verification_trials())?;
    let mut trials = Vec::with_capacity(table.len());
    for row in table.rows() {
        let target = match table.text(row, "target")? {
            "target" => true,
            "nontarget" => false,
            other => {
                return Err(ProtocolError::InvalidTargetFlag {
                    path: path.to_path_buf(),
                    value: other.to_string(),
                })
            }
        };
        trials.push(VerificationTrialRow {
            model_id: table.text(row, "model_id")?.to_string(),
            uri: table.text(row, "uri")?.to_string(),
            try_with: Segment::new(table.number(row, "start")?, table.number(row, "end")?),
            target,
        });
    }
    Ok(trials)
}

/// Interval of a turn row, `[start, start + duration)`.
///
/// Zero-duration turns yield `None` silently; negative durations yield
/// `None` with a warning naming the recording and label.
pub(crate) fn turn_segment(turn: &TurnRow, uri: &str) -> Option<Segment> {
    if turn.duration < 0.0 {
        tracing::warn!(
            uri,
            label = %turn.label,
            duration = turn.duration,
            "dropping turn with negative duration"
        );
        return None;
    }
    if turn.duration == 0.0 {
        return None;
    }
    Some(Segment::new(turn.start, turn.start + turn.duration))
}

/// Build an annotation from turn rows, assigning a running track index
/// to every kept turn.
pub(crate) fn build_annotation(uri: &str, turns: &[TurnRow]) -> Annotation {
    let mut annotation = Annotation::new(uri);
    let mut track = 0;
    for turn in turns {
        if let Some(segment) = turn_segment(turn, uri) {
            annotation.insert(segment, track, turn.label.as_str());
            track += 1;
        }
    }
    annotation
}

/// Collect turn row intervals into a timeline, in row order.
pub(crate) fn turns_to_timeline(uri: &str, turns: &[TurnRow]) -> Timeline {
    let mut timeline = Timeline::new(uri);
    for turn in turns {
        if let Some(segment) = turn_segment(turn, uri) {
            timeline.add(segment);
        }
    }
    timeline
}
