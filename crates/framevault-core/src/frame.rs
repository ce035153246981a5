//! Backup Frame Model and Wire Codec
//!
//! This module defines the [`Frame`] sum type - one entry per archivable
//! domain entity - and its binary encoding.
//!
//! ## Frame Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Frame tag (1 byte)                           │
//! ├──────────────────────────────────────────────┤
//! │ Fields in fixed order:                       │
//! │ - integers as varints                        │
//! │ - enums as 1-byte discriminants              │
//! │ - keys as fixed-length raw bytes             │
//! │ - strings as varint length + UTF-8 bytes     │
//! │ - optionals as 1-byte presence + value       │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Frames carry no internal length; the snapshot container prefixes each
//! frame with a varint length before it enters the transform pipeline.
//!
//! ## Validation
//!
//! Decoding is strict: unknown tags, unknown enum discriminants, bad UTF-8,
//! and truncated buffers all fail with a typed [`Error`]. [`Frame::validate`]
//! re-checks schema-level requirements (non-empty MIME type, sane lengths)
//! and runs before any domain reconstruction proceeds. A frame that decodes
//! and validates is a valid instance of its wire schema; anything less never
//! reaches an archiver.

use bytes::{Buf, BufMut, BytesMut};

use crate::id::{CallId, ConversationId, StickerPackId};
use crate::varint;
use crate::{Error, Result};

/// Frame tag for call records.
pub const FRAME_TAG_CALL: u8 = 1;
/// Frame tag for sticker messages.
pub const FRAME_TAG_STICKER: u8 = 2;

/// One backup frame: a single serialized domain entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Call(CallFrame),
    Sticker(StickerFrame),
}

/// What kind of call a call frame describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Audio,
    Video,
    Group,
}

/// Who initiated the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallDirection {
    Incoming,
    Outgoing,
}

/// Terminal state of an archived call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Accepted,
    Missed,
    Declined,
    Joined,
}

/// How an attachment should be rendered after restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderingFlag {
    Default,
    Voice,
    Borderless,
    Gif,
}

/// A call record frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    pub call_id: u64,
    pub conversation_id: ConversationId,
    pub kind: CallKind,
    pub direction: CallDirection,
    pub status: CallStatus,
    /// Call start, milliseconds since epoch.
    pub started_at_ms: u64,
}

impl CallFrame {
    /// The log-safe identity of this frame.
    pub fn frame_id(&self) -> CallId {
        CallId::new(self.call_id, self.conversation_id)
    }
}

/// Attachment metadata carried inside attachment-bearing frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentInfo {
    pub mime_type: String,
    /// Length of the attachment plaintext in bytes. Restore-side unpadding
    /// truncates to this.
    pub plaintext_length: u64,
    pub caption: Option<String>,
    pub rendering_flag: RenderingFlag,
    pub filename: Option<String>,
}

/// A sticker message frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerFrame {
    pub pack_id: StickerPackId,
    pub pack_key: [u8; 32],
    pub sticker_index: u32,
    pub emoji: Option<String>,
    pub attachment: AttachmentInfo,
}

impl Frame {
    /// Frame type name for logs and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Frame::Call(_) => "call",
            Frame::Sticker(_) => "sticker",
        }
    }

    /// Encode this frame into `buf`.
    pub fn encode(&self, buf: &mut BytesMut) {
        match self {
            Frame::Call(call) => {
                buf.put_u8(FRAME_TAG_CALL);
                varint::encode_u64(buf, call.call_id);
                varint::encode_u64(buf, call.conversation_id.0);
                buf.put_u8(call.kind as u8);
                buf.put_u8(call.direction as u8);
                buf.put_u8(call.status as u8);
                varint::encode_u64(buf, call.started_at_ms);
            }
            Frame::Sticker(sticker) => {
                buf.put_u8(FRAME_TAG_STICKER);
                buf.put_slice(sticker.pack_id.as_bytes());
                buf.put_slice(&sticker.pack_key);
                varint::encode_u64(buf, sticker.sticker_index as u64);
                encode_opt_string(buf, sticker.emoji.as_deref());
                encode_string(buf, &sticker.attachment.mime_type);
                varint::encode_u64(buf, sticker.attachment.plaintext_length);
                encode_opt_string(buf, sticker.attachment.caption.as_deref());
                buf.put_u8(sticker.attachment.rendering_flag as u8);
                encode_opt_string(buf, sticker.attachment.filename.as_deref());
            }
        }
    }

    /// Decode one frame from `buf`.
    pub fn decode(buf: &mut impl Buf) -> Result<Frame> {
        let tag = read_u8(buf)?;
        match tag {
            FRAME_TAG_CALL => {
                let call_id = varint::decode_u64(buf)?;
                let conversation_id = ConversationId(varint::decode_u64(buf)?);
                let kind = decode_call_kind(read_u8(buf)?)?;
                let direction = decode_call_direction(read_u8(buf)?)?;
                let status = decode_call_status(read_u8(buf)?)?;
                let started_at_ms = varint::decode_u64(buf)?;
                Ok(Frame::Call(CallFrame {
                    call_id,
                    conversation_id,
                    kind,
                    direction,
                    status,
                    started_at_ms,
                }))
            }
            FRAME_TAG_STICKER => {
                let mut pack_id = [0u8; 16];
                read_exact(buf, &mut pack_id)?;
                let mut pack_key = [0u8; 32];
                read_exact(buf, &mut pack_key)?;

                let sticker_index = varint::decode_u64(buf)?;
                let sticker_index =
                    u32::try_from(sticker_index).map_err(|_| Error::InvalidField {
                        field: "sticker_index",
                        reason: format!("{} does not fit in u32", sticker_index),
                    })?;

                let emoji = decode_opt_string(buf, "emoji")?;
                let mime_type = decode_string(buf, "mime_type")?;
                let plaintext_length = varint::decode_u64(buf)?;
                let caption = decode_opt_string(buf, "caption")?;
                let rendering_flag = decode_rendering_flag(read_u8(buf)?)?;
                let filename = decode_opt_string(buf, "filename")?;

                Ok(Frame::Sticker(StickerFrame {
                    pack_id: StickerPackId(pack_id),
                    pack_key,
                    sticker_index,
                    emoji,
                    attachment: AttachmentInfo {
                        mime_type,
                        plaintext_length,
                        caption,
                        rendering_flag,
                        filename,
                    },
                }))
            }
            other => Err(Error::UnknownFrameType(other)),
        }
    }

    /// Schema validation. Runs on every decoded frame before domain
    /// reconstruction, and on every frame before it is written.
    pub fn validate(&self) -> Result<()> {
        match self {
            Frame::Call(_) => Ok(()),
            Frame::Sticker(sticker) => {
                if sticker.attachment.mime_type.is_empty() {
                    return Err(Error::InvalidField {
                        field: "mime_type",
                        reason: "must not be empty".to_string(),
                    });
                }
                if sticker.pack_key.iter().all(|&b| b == 0) {
                    return Err(Error::InvalidField {
                        field: "pack_key",
                        reason: "must not be all zeroes".to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}

fn encode_string(buf: &mut BytesMut, value: &str) {
    varint::encode_u64(buf, value.len() as u64);
    buf.put_slice(value.as_bytes());
}

fn encode_opt_string(buf: &mut BytesMut, value: Option<&str>) {
    match value {
        Some(value) => {
            buf.put_u8(1);
            encode_string(buf, value);
        }
        None => buf.put_u8(0),
    }
}

fn read_u8(buf: &mut impl Buf) -> Result<u8> {
    if !buf.has_remaining() {
        return Err(Error::Truncated);
    }
    Ok(buf.get_u8())
}

fn read_exact(buf: &mut impl Buf, out: &mut [u8]) -> Result<()> {
    if buf.remaining() < out.len() {
        return Err(Error::Truncated);
    }
    buf.copy_to_slice(out);
    Ok(())
}

fn decode_string(buf: &mut impl Buf, field: &'static str) -> Result<String> {
    let len = varint::decode_u64(buf)? as usize;
    if buf.remaining() < len {
        return Err(Error::Truncated);
    }
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);
    String::from_utf8(bytes).map_err(|_| Error::InvalidField {
        field,
        reason: "not valid UTF-8".to_string(),
    })
}

fn decode_opt_string(buf: &mut impl Buf, field: &'static str) -> Result<Option<String>> {
    match read_u8(buf)? {
        0 => Ok(None),
        1 => Ok(Some(decode_string(buf, field)?)),
        other => Err(Error::UnknownDiscriminant {
            field,
            value: other as u64,
        }),
    }
}

fn decode_call_kind(value: u8) -> Result<CallKind> {
    match value {
        0 => Ok(CallKind::Audio),
        1 => Ok(CallKind::Video),
        2 => Ok(CallKind::Group),
        other => Err(Error::UnknownDiscriminant {
            field: "call_kind",
            value: other as u64,
        }),
    }
}

fn decode_call_direction(value: u8) -> Result<CallDirection> {
    match value {
        0 => Ok(CallDirection::Incoming),
        1 => Ok(CallDirection::Outgoing),
        other => Err(Error::UnknownDiscriminant {
            field: "call_direction",
            value: other as u64,
        }),
    }
}

fn decode_call_status(value: u8) -> Result<CallStatus> {
    match value {
        0 => Ok(CallStatus::Accepted),
        1 => Ok(CallStatus::Missed),
        2 => Ok(CallStatus::Declined),
        3 => Ok(CallStatus::Joined),
        other => Err(Error::UnknownDiscriminant {
            field: "call_status",
            value: other as u64,
        }),
    }
}

fn decode_rendering_flag(value: u8) -> Result<RenderingFlag> {
    match value {
        0 => Ok(RenderingFlag::Default),
        1 => Ok(RenderingFlag::Voice),
        2 => Ok(RenderingFlag::Borderless),
        3 => Ok(RenderingFlag::Gif),
        other => Err(Error::UnknownDiscriminant {
            field: "rendering_flag",
            value: other as u64,
        }),
    }
}
