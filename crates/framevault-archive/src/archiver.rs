//! Archiver Contract
//!
//! The protocol every backup-capable subsystem implements. One archiver
//! type per domain entity; the same type handles both directions, which is
//! what makes read/write symmetry enforceable in tests: for every domain
//! object `d`, `restore(archive(d))` must produce an equivalent object.
//!
//! Archivers receive domain objects already resolved (attachment metadata
//! derived, resource references resolved) and a context carrying the
//! caller's transaction handle. They never perform resolution themselves
//! and never skip a frame: an object that cannot be serialized is a typed,
//! frame-specific error.

use framevault_core::Frame;

use crate::context::{ArchiveContext, RestoreContext};
use crate::error::ArchiveError;

/// Conversion between one domain type and its backup frame representation.
pub trait FrameArchiver {
    /// The domain type this archiver covers.
    type Domain;

    /// Serialize one domain object into a frame. All-or-nothing: on error,
    /// no frame is produced and the caller must fail the export.
    fn archive(
        &self,
        object: &Self::Domain,
        ctx: &mut ArchiveContext<'_>,
    ) -> Result<Frame, ArchiveError>;

    /// Reconstruct a domain object from a validated frame. Fails with
    /// [`ArchiveError::UnexpectedFrameType`] if handed another archiver's
    /// frame.
    fn restore(
        &self,
        frame: &Frame,
        ctx: &mut RestoreContext<'_>,
    ) -> Result<Self::Domain, ArchiveError>;
}
