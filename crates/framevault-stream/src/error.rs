//! Stream Layer Error Types
//!
//! ## Error Categories
//!
//! ### Transport Errors ([`IoError`])
//! - `PartialTransfer`: fewer bytes moved than requested, and the
//!   implementation could not complete the transfer
//! - `Closed`: the stream was used after being finalized
//! - `Io`: the underlying file or socket failed
//!
//! ### Transform Errors ([`TransformError`])
//! Every transform failure names the stage that produced it, so a corrupt
//! snapshot can be diagnosed without re-running the pipeline. Kinds:
//! - `Corrupt`: the stage detected undecodable input (bad frame, failed
//!   authentication tag, lz4 error)
//! - `UnsupportedConfig`: the stage cannot operate as configured
//! - `TruncatedInput`: the stream ended in the middle of a stage's framing
//! - `Poisoned`: a call after an earlier failure on the same stream
//!
//! Lower layers never swallow these; they propagate typed failures upward.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("partial transfer: moved {actual} of {expected} bytes")]
    PartialTransfer { expected: usize, actual: usize },

    #[error("stream is closed")]
    Closed,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A transform failure, tagged with the stage that failed.
#[derive(Debug, Error)]
#[error("transform stage {stage} failed: {kind}")]
pub struct TransformError {
    pub stage: &'static str,
    pub kind: TransformErrorKind,
}

#[derive(Debug, Error)]
pub enum TransformErrorKind {
    #[error("corrupt input: {0}")]
    Corrupt(String),

    #[error("unsupported configuration: {0}")]
    UnsupportedConfig(String),

    #[error("input ended mid-stream")]
    TruncatedInput,

    #[error("pipeline already failed or finished")]
    Poisoned,
}

impl TransformError {
    pub fn corrupt(stage: &'static str, reason: impl Into<String>) -> Self {
        Self {
            stage,
            kind: TransformErrorKind::Corrupt(reason.into()),
        }
    }

    pub fn unsupported(stage: &'static str, reason: impl Into<String>) -> Self {
        Self {
            stage,
            kind: TransformErrorKind::UnsupportedConfig(reason.into()),
        }
    }

    pub fn truncated(stage: &'static str) -> Self {
        Self {
            stage,
            kind: TransformErrorKind::TruncatedInput,
        }
    }

    pub fn poisoned(stage: &'static str) -> Self {
        Self {
            stage,
            kind: TransformErrorKind::Poisoned,
        }
    }
}

/// Either side of a pipeline-to-sink operation can fail.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}
