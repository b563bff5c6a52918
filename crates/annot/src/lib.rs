//! Time-based containers for speaker annotations of meeting recordings.
//!
//! Three types build on each other:
//!
//! - [`Segment`]: a half-open time interval `[start, end)` in seconds
//! - [`Timeline`]: an ordered set of segments over one recording
//! - [`Annotation`]: speaker-labelled turns over one recording
//!
//! All three stay agnostic of where their content came from; file parsing
//! and protocol assembly live in the crates built on top of this one.

mod annotation;
mod segment;
mod timeline;

pub use annotation::{Annotation, Turn};
pub use segment::Segment;
pub use timeline::Timeline;
