//! FrameVault Core
//!
//! This crate defines the core data model for FrameVault backup snapshots.
//!
//! ## What is a Frame?
//! A frame is one serialized record in a backup snapshot, representing one
//! domain entity: a call, a sticker message, and so on. A snapshot is a
//! sequence of frames written through a transform pipeline to a sink.
//!
//! ## What Lives Here
//! - **Frame identities** ([`id`]): structured, log-safe identifiers for
//!   frames. Sensitive raw identifiers never appear in log output; they are
//!   replaced by a short SHA-256 digest.
//! - **Frame model** ([`frame`]): the tagged-variant [`Frame`] type and its
//!   binary wire codec. Decoding validates everything before a domain object
//!   is reconstructed from it.
//! - **Varints** ([`varint`]): variable-length integer encoding used for
//!   frame lengths and numeric fields. Decoding is fallible because snapshot
//!   input is untrusted.
//! - **Errors** ([`error`]): the typed failures shared by all of the above.
//!
//! Higher layers build on this crate: `framevault-stream` moves frame bytes
//! through transform stages, and `framevault-archive` converts between
//! domain objects and frames.

pub mod error;
pub mod frame;
pub mod id;
pub mod varint;

pub use error::{Error, Result};
pub use frame::{
    AttachmentInfo, CallDirection, CallFrame, CallKind, CallStatus, Frame, RenderingFlag,
    StickerFrame,
};
pub use id::{log_safe_digest, CallId, ConversationId, FrameId, StickerPackId};
