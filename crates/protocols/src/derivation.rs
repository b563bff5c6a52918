//! Mapping from enrolment model identifiers to claimed speaker identities.

use std::collections::HashMap;

/// How a trial's claimed speaker is derived from its model identifier.
///
/// Corpus model identifiers conventionally read `SPKR1_m1`: a speaker
/// label followed by an `_`-delimited model suffix. [`TrimModelSuffix`]
/// relies on that convention; [`Lookup`] replaces it with an explicit
/// table for identifier formats where the convention does not hold.
///
/// [`TrimModelSuffix`]: SpeakerDerivation::TrimModelSuffix
/// [`Lookup`]: SpeakerDerivation::Lookup
#[derive(Debug, Clone, Default)]
pub enum SpeakerDerivation {
    /// Strip the last `_`-delimited suffix: `SPKR1_m1` becomes `SPKR1`.
    /// Identifiers without an underscore pass through unchanged.
    #[default]
    TrimModelSuffix,
    /// Explicit model-id-to-speaker table. Trials whose model is not in
    /// the table are skipped with a warning.
    Lookup(HashMap<String, String>),
}

impl SpeakerDerivation {
    /// Claimed speaker for `model_id`, `None` when no mapping exists.
    pub fn speaker_for<'a>(&'a self, model_id: &'a str) -> Option<&'a str> {
        match self {
            SpeakerDerivation::TrimModelSuffix => Some(
                model_id
                    .rsplit_once('_')
                    .map(|(speaker, _)| speaker)
                    .unwrap_or(model_id),
            ),
            SpeakerDerivation::Lookup(table) => table.get(model_id).map(String::as_str),
        }
    }
}
