//! Sticker Message Archiver
//!
//! Converts between a local sticker message and its backup frame. The
//! attachment metadata on the domain side is already derived (length and
//! filename from the data source, via [`crate::AttachmentDataSource`]), so
//! archiving is a straight field mapping plus validation.
//!
//! Restoring a sticker also re-registers its pack key with the caller's
//! store, so a restored device can fetch the rest of the pack.

use bytes::Bytes;
use framevault_core::{AttachmentInfo, Frame, FrameId, StickerFrame, StickerPackId};
use tracing::debug;

use crate::archiver::FrameArchiver;
use crate::context::{ArchiveContext, RestoreContext};
use crate::data_source::AttachmentDataSource;
use crate::error::ArchiveError;

/// Store collection holding pack keys, keyed by hex pack id.
pub const STICKER_PACK_KEY_COLLECTION: &str = "sticker-pack-keys";

/// A local sticker message, as handed to the archiver by the messages
/// subsystem. Attachment metadata is already derived at ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerMessage {
    pub pack_id: StickerPackId,
    pub pack_key: [u8; 32],
    pub sticker_index: u32,
    pub emoji: Option<String>,
    pub attachment: AttachmentInfo,
}

impl StickerMessage {
    /// Build a sticker message from its identity plus the attachment data
    /// source, deriving the wire metadata from the source.
    pub fn from_data_source(
        pack_id: StickerPackId,
        pack_key: [u8; 32],
        sticker_index: u32,
        emoji: Option<String>,
        source: &AttachmentDataSource,
    ) -> Self {
        Self {
            pack_id,
            pack_key,
            sticker_index,
            emoji,
            attachment: source.to_info(),
        }
    }
}

/// Archiver for sticker messages.
#[derive(Debug, Default)]
pub struct StickerArchiver;

impl StickerArchiver {
    pub fn new() -> Self {
        Self
    }
}

impl FrameArchiver for StickerArchiver {
    type Domain = StickerMessage;

    fn archive(
        &self,
        message: &StickerMessage,
        _ctx: &mut ArchiveContext<'_>,
    ) -> Result<Frame, ArchiveError> {
        if message.attachment.mime_type.is_empty() {
            return Err(ArchiveError::MissingField {
                frame_type: "sticker",
                field: "mime_type",
            });
        }

        let frame = Frame::Sticker(StickerFrame {
            pack_id: message.pack_id,
            pack_key: message.pack_key,
            sticker_index: message.sticker_index,
            emoji: message.emoji.clone(),
            attachment: message.attachment.clone(),
        });
        frame.validate()?;
        debug!(id = %message.pack_id.log_string(), "archived sticker message");
        Ok(frame)
    }

    fn restore(
        &self,
        frame: &Frame,
        ctx: &mut RestoreContext<'_>,
    ) -> Result<StickerMessage, ArchiveError> {
        let sticker = match frame {
            Frame::Sticker(sticker) => sticker,
            other => {
                return Err(ArchiveError::UnexpectedFrameType {
                    expected: "sticker",
                    got: other.type_name(),
                })
            }
        };

        // Re-register the pack key so pack downloads work after restore.
        ctx.store().put(
            STICKER_PACK_KEY_COLLECTION,
            &hex::encode(sticker.pack_id.as_bytes()),
            Bytes::copy_from_slice(&sticker.pack_key),
        );

        Ok(StickerMessage {
            pack_id: sticker.pack_id,
            pack_key: sticker.pack_key,
            sticker_index: sticker.sticker_index,
            emoji: sticker.emoji.clone(),
            attachment: sticker.attachment.clone(),
        })
    }
}
