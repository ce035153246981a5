//! Error Types for the Frame Model
//!
//! Every failure while encoding or decoding frames is one of these typed
//! variants. Snapshot input is untrusted, so nothing here panics: a
//! truncated buffer, an unknown enum discriminant, or a checksum mismatch
//! all surface as errors the caller can act on.
//!
//! ## Error Categories
//!
//! ### Container Errors
//! - `InvalidMagic`: snapshot doesn't start/end with the expected magic bytes
//! - `UnsupportedVersion`: snapshot written by a newer format version
//! - `CrcMismatch`: corruption detected via checksum
//!
//! ### Frame Decode Errors
//! - `Truncated`: buffer ended mid-field
//! - `VarintOverflow`: varint longer than 64 bits
//! - `UnknownFrameType`: frame tag byte not recognized
//! - `UnknownDiscriminant`: enum field carries an unrecognized value
//! - `InvalidField`: a field was present but unusable (bad UTF-8, bad length)
//!
//! All functions in this crate return `Result<T>`, aliased to
//! `Result<T, Error>`, so `?` propagation works throughout.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid magic bytes")]
    InvalidMagic,

    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u16),

    #[error("Truncated input")]
    Truncated,

    #[error("Varint exceeds 64 bits")]
    VarintOverflow,

    #[error("Unknown frame type: {0}")]
    UnknownFrameType(u8),

    #[error("Unknown discriminant {value} for {field}")]
    UnknownDiscriminant { field: &'static str, value: u64 },

    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("CRC mismatch")]
    CrcMismatch,
}
