//! Archive Layer Error Types
//!
//! ## Error Categories
//!
//! ### Resolution Errors ([`ResolutionError`])
//! A resource/attachment reference could not be turned into concrete
//! metadata. The resolution service's failure propagates as ours.
//!
//! ### Archive Errors ([`ArchiveError`])
//! - `UnsupportedVariant`: the domain object is in a state the frame schema
//!   cannot represent (e.g. a call still in progress)
//! - `MissingField`: a required field was absent at archive time
//! - `UnexpectedFrameType`: restore was handed a frame belonging to a
//!   different archiver
//! - `ConversationIdMissing`: a frame references a conversation that should
//!   already have an id assigned from having been archived, but does not
//! - wrapped lower-layer failures: frame codec, transform pipeline, I/O
//!
//! The propagation policy across the whole crate: failures travel upward
//! typed, and archivers may not downgrade one into a silently-skipped
//! frame. An export fails as a whole if any required frame fails.

use thiserror::Error;

use framevault_stream::{IoError, StreamError, TransformError};

use crate::resource::AttachmentRef;

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("attachment reference {0:?} cannot be resolved")]
    UnresolvableReference(AttachmentRef),

    #[error("io error while resolving: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("unsupported {frame_type} variant: {detail}")]
    UnsupportedVariant {
        frame_type: &'static str,
        detail: String,
    },

    #[error("missing required field {field} on {frame_type} frame")]
    MissingField {
        frame_type: &'static str,
        field: &'static str,
    },

    #[error("expected {expected} frame, got {got}")]
    UnexpectedFrameType {
        expected: &'static str,
        got: &'static str,
    },

    #[error("no conversation id assigned for {0}")]
    ConversationIdMissing(String),

    #[error("snapshot frame count mismatch: header says {expected}, found {found}")]
    FrameCountMismatch { expected: u32, found: u32 },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Frame(#[from] framevault_core::Error),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Io(#[from] IoError),
}

impl From<StreamError> for ArchiveError {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::Io(e) => ArchiveError::Io(e),
            StreamError::Transform(e) => ArchiveError::Transform(e),
        }
    }
}
