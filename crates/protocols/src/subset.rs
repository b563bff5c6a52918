//! Corpus subsets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Corpus subset a protocol entry point iterates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subset {
    Train,
    Dev,
    Test,
}

impl Subset {
    /// All subsets, in the conventional order.
    pub const ALL: [Subset; 3] = [Subset::Train, Subset::Dev, Subset::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subset::Train => "train",
            Subset::Dev => "dev",
            Subset::Test => "test",
        }
    }

    /// Short tag used in annotation file names.
    pub fn tag(&self) -> &'static str {
        match self {
            Subset::Train => "trn",
            Subset::Dev => "dev",
            Subset::Test => "tst",
        }
    }
}

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
