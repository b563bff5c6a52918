//! Plain speaker-diarization protocols over UEM and MDTM files.

use crate::error::Result;
use crate::loader::{self, Grouped, TurnRow};
use crate::record::{DiarizationItem, DATABASE};
use crate::{files, schema, Subset};
use odessa_annot::{Segment, Timeline};
use std::path::PathBuf;

/// File-naming variant of the plain diarization protocols.
///
/// The variants partition the corpus differently and never share file
/// content; picking a variant picks the files, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiarizationVariant {
    /// First partition.
    P1,
    /// First partition, mix-headset audio.
    P1Mh,
    /// Second partition.
    P2,
    /// Second partition, mix-headset audio.
    P2Mh,
}

impl DiarizationVariant {
    /// Stem used in annotation file names.
    pub fn stem(&self) -> &'static str {
        match self {
            DiarizationVariant::P1 => "p1",
            DiarizationVariant::P1Mh => "p1mh",
            DiarizationVariant::P2 => "p2",
            DiarizationVariant::P2Mh => "p2mh",
        }
    }
}

/// Plain speaker-diarization protocol: one item per annotated recording.
///
/// Reads `{stem}.{subset}.uem` for the annotated regions and
/// `{stem}.{subset}.mdtm` for the reference turns, both directly under
/// the data directory.
#[derive(Debug, Clone)]
pub struct SpeakerDiarization {
    data_dir: PathBuf,
    variant: DiarizationVariant,
}

impl SpeakerDiarization {
    pub fn new(data_dir: impl Into<PathBuf>, variant: DiarizationVariant) -> Self {
        Self {
            data_dir: data_dir.into(),
            variant,
        }
    }

    pub fn variant(&self) -> DiarizationVariant {
        self.variant
    }

    /// Items for `subset`, one per annotated uri, in sorted-uri order.
    ///
    /// File and parse failures surface here. A uri with no annotation
    /// turns is skipped with a warning during iteration.
    pub fn subset(&self, subset: Subset) -> Result<DiarizationIter> {
        let stem = self.variant.stem();
        let annotated = loader::load_uem(&files::diarization_uem(&self.data_dir, stem, subset))?;
        let turns = loader::load_turn_groups(
            &files::diarization_mdtm(&self.data_dir, stem, subset),
            schema::mdtm(),
            &["uri"],
            "speaker",
        )?;
        let mut uris: Vec<String> = annotated.keys().map(|key| key[0].clone()).collect();
        uris.sort();
        Ok(DiarizationIter {
            uris: uris.into_iter(),
            annotated,
            turns,
        })
    }

    pub fn train(&self) -> Result<DiarizationIter> {
        self.subset(Subset::Train)
    }

    pub fn dev(&self) -> Result<DiarizationIter> {
        self.subset(Subset::Dev)
    }

    pub fn test(&self) -> Result<DiarizationIter> {
        self.subset(Subset::Test)
    }
}

/// Lazy item sequence for one diarization subset.
#[derive(Debug)]
pub struct DiarizationIter {
    uris: std::vec::IntoIter<String>,
    annotated: Grouped<Segment>,
    turns: Grouped<TurnRow>,
}

impl Iterator for DiarizationIter {
    type Item = DiarizationItem;

    fn next(&mut self) -> Option<DiarizationItem> {
        loop {
            let uri = self.uris.next()?;
            let turns = match self.turns.get(&[&uri]) {
                Ok(turns) => turns,
                Err(error) => {
                    tracing::warn!(uri = %uri, %error, "skipping uri without turns");
                    continue;
                }
            };
            let regions = self.annotated.get(&[&uri]).unwrap_or_default();
            let annotated = Timeline::from_segments(uri.clone(), regions.iter().copied());
            let annotation = loader::build_annotation(&uri, turns);
            return Some(DiarizationItem {
                database: DATABASE.to_string(),
                uri,
                annotated,
                annotation,
                crop: None,
            });
        }
    }
}
