//! Error types for protocol loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while loading protocol files.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Reading, parsing or grouping an annotation table failed.
    #[error(transparent)]
    Table(#[from] odessa_table::TableError),

    /// A trial row's target flag is neither `target` nor `nontarget`.
    #[error("invalid target flag '{value}' in '{path}'")]
    InvalidTargetFlag { path: PathBuf, value: String },
}
