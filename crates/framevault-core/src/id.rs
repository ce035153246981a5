//! Frame Identities
//!
//! Every frame type gets a structured identifier used for cross-referencing
//! within a snapshot and for logging. The hard rule for every identity type:
//! a raw identifier that is sensitive (shared across clients, or usable as a
//! lookup key) must never appear in log output in plaintext. It is surfaced
//! as a short, non-reversible SHA-256 digest instead. The relationship
//! identifier (conversation reference) is not sensitive and stays visible,
//! so operators can still correlate log lines.
//!
//! A [`CallId`] is the composite of a 64-bit call identifier and the
//! conversation it belongs to; the composite is unique within one snapshot.
//! [`StickerPackId`] is a raw pack lookup key and gets the same treatment.
//!
//! Identity values are immutable once constructed.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Render bytes as a short non-reversible digest for logging.
///
/// First 8 bytes of SHA-256, hex encoded. Enough to correlate log lines,
/// not enough to recover the raw identifier.
pub fn log_safe_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(&digest[..8])
}

/// Log-safe identity for one frame type.
///
/// Implementations must keep sensitive raw identifiers out of
/// `id_log_string`; use [`log_safe_digest`] for those.
pub trait FrameId {
    /// The frame type name as it appears in logs, e.g. `"CallId"`.
    fn type_log_string(&self) -> &'static str;

    /// The identifier rendering. Sensitive parts are digests, the
    /// relationship identifier stays plain.
    fn id_log_string(&self) -> String;

    fn log_string(&self) -> String {
        format!("{}({})", self.type_log_string(), self.id_log_string())
    }
}

/// Relationship identifier: which conversation a frame belongs to.
///
/// Assigned in first-seen order while archiving, so it carries no meaning
/// outside one snapshot and is safe to log as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub u64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conv:{}", self.0)
    }
}

/// Composite identity of a call frame.
///
/// The raw call id is shared across clients and must not be logged;
/// `Debug` and [`FrameId`] both render it as a digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId {
    call_id: u64,
    conversation_id: ConversationId,
}

impl CallId {
    pub fn new(call_id: u64, conversation_id: ConversationId) -> Self {
        Self {
            call_id,
            conversation_id,
        }
    }

    /// The raw call identifier, for wire encoding only. Keep it out of logs.
    pub fn raw_call_id(&self) -> u64 {
        self.call_id
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }
}

impl FrameId for CallId {
    fn type_log_string(&self) -> &'static str {
        "CallId"
    }

    fn id_log_string(&self) -> String {
        format!(
            "{}:{}",
            log_safe_digest(&self.call_id.to_le_bytes()),
            self.conversation_id
        )
    }
}

impl fmt::Debug for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.log_string())
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.log_string())
    }
}

/// Identity of a sticker pack. The raw value doubles as a lookup key for
/// pack contents, so it is treated as sensitive.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StickerPackId(pub [u8; 16]);

impl StickerPackId {
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl FrameId for StickerPackId {
    fn type_log_string(&self) -> &'static str {
        "StickerPackId"
    }

    fn id_log_string(&self) -> String {
        log_safe_digest(&self.0)
    }
}

impl fmt::Debug for StickerPackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.log_string())
    }
}
