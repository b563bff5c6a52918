//! Dataset protocols for the AMI meeting corpus.
//!
//! Reads the corpus' text-based annotation files (UEM annotated regions,
//! MDTM and RTTM speaker turns, session mappings, enrolment and trial
//! lists) and reshapes them into per-recording items for a
//! speaker-diarization evaluation framework:
//!
//! - [`SpeakerDiarization`]: one item per annotated recording, in the
//!   P1 / P1MH / P2 / P2MH file-naming variants
//! - [`SpeakerSpotting`]: session-split mix-headset items, each carrying
//!   a session-relative `crop` twin re-based to start at zero
//! - [`SpeakerVerification`]: uri-keyed enrolments and target/nontarget
//!   trials
//!
//! Entry points read and validate their files eagerly, then hand back a
//! lazy, finite iterator over assembled items. Calling an entry point
//! again re-reads the files; nothing is cached.
//!
//! # Example
//!
//! ```ignore
//! use odessa_protocols::{DiarizationVariant, SpeakerDiarization, Subset};
//!
//! let protocol = SpeakerDiarization::new("data", DiarizationVariant::P1Mh);
//! for item in protocol.subset(Subset::Dev)? {
//!     println!("{}: {} turns", item.uri, item.annotation.len());
//! }
//! ```

mod derivation;
mod diarization;
mod error;
mod files;
mod loader;
mod record;
pub mod schema;
mod spotting;
mod subset;
mod verification;

pub use derivation::SpeakerDerivation;
pub use diarization::{DiarizationIter, DiarizationVariant, SpeakerDiarization};
pub use error::{ProtocolError, Result};
pub use record::{DiarizationItem, EnrolmentItem, TrialItem, DATABASE};
pub use spotting::{
    SpeakerSpotting, SpottingEnrolments, SpottingIter, SpottingTrials, MIX_HEADSET_SUFFIX,
};
pub use subset::Subset;
pub use verification::{SpeakerVerification, VerificationEnrolments, VerificationTrials};
