//! FrameVault Archive Layer
//!
//! This crate converts between domain objects and backup frames, and writes
//! frames into snapshot containers through the stream layer.
//!
//! ## Data Flow
//!
//! ```text
//! ┌───────────────┐   resolve    ┌──────────────────┐
//! │ domain object │─────────────▶│ FrameArchiver    │
//! │ (call,        │  (resource   │  archive()       │
//! │  sticker)     │   metadata)  └────────┬─────────┘
//! └───────────────┘                       │ Frame
//!                                         ▼
//!                               ┌──────────────────┐
//!                               │ SnapshotWriter   │
//!                               │  varint-framed,  │
//!                               │  piped through   │
//!                               │  transforms      │
//!                               └────────┬─────────┘
//!                                        │ bytes
//!                                        ▼
//!                                  StreamSink
//! ```
//!
//! Restore reverses the flow: [`SnapshotReader`] validates the container,
//! runs the mirrored pipeline, and hands validated frames back to the same
//! archiver types for domain reconstruction.
//!
//! ## Ground Rules
//!
//! - Archivers are read/write symmetric: whatever a type emits, the same
//!   type parses back into an equivalent domain object.
//! - Archivers receive domain objects already resolved; resolution happens
//!   in [`resource`], never inside an archiver.
//! - A frame that cannot be serialized is a frame-specific error, never a
//!   silent omission. A backup that looks complete but is missing data is a
//!   correctness violation.
//! - Transaction handles come from the caller. This crate never constructs
//!   or commits transactions; read-only vs write-capable is distinguished
//!   at the type level ([`store`]).

pub mod archiver;
pub mod call;
pub mod context;
pub mod data_source;
pub mod error;
pub mod resource;
pub mod snapshot;
pub mod sticker;
pub mod store;

pub use archiver::FrameArchiver;
pub use call::{CallArchiver, CallRecord, CallRecordStatus};
pub use context::{ArchiveContext, RestoreContext};
pub use data_source::{AttachmentDataSource, DataSource};
pub use error::{ArchiveError, ResolutionError};
pub use resource::{
    resolve_sticker_metadata, AttachmentRef, EncryptedStickerMetadata, LegacyStickerMetadata,
    ResolvedAttachment, ResourceResolver, ResourceStream, StickerInfo, StickerMetadata,
};
pub use snapshot::{
    SnapshotInfo, SnapshotReader, SnapshotWriter, SNAPSHOT_MAGIC, SNAPSHOT_VERSION,
};
pub use sticker::{StickerArchiver, StickerMessage, STICKER_PACK_KEY_COLLECTION};
pub use store::{MemoryStore, StoreRead, StoreWrite};
