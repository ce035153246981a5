//! Call Record Archiver
//!
//! Converts between the local call record and its backup frame. The domain
//! status enum is wider than the wire schema: a call still ringing or in
//! progress has no terminal state to archive, so archiving one is an
//! `UnsupportedVariant` error rather than a guess or a skip.

use framevault_core::{CallDirection, CallFrame, CallKind, CallStatus, Frame, FrameId};
use tracing::debug;

use crate::archiver::FrameArchiver;
use crate::context::{ArchiveContext, RestoreContext};
use crate::error::ArchiveError;

/// Terminal and non-terminal states a local call record can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallRecordStatus {
    Accepted,
    Missed,
    Declined,
    Joined,
    /// Ringing or in progress. Not archivable.
    Pending,
}

/// A local call record, as handed to the archiver by the calls subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub call_id: u64,
    pub conversation_unique_id: String,
    pub kind: CallKind,
    pub direction: CallDirection,
    pub status: CallRecordStatus,
    pub started_at_ms: u64,
}

/// Archiver for call records.
#[derive(Debug, Default)]
pub struct CallArchiver;

impl CallArchiver {
    pub fn new() -> Self {
        Self
    }
}

fn status_to_wire(status: CallRecordStatus) -> Result<CallStatus, ArchiveError> {
    match status {
        CallRecordStatus::Accepted => Ok(CallStatus::Accepted),
        CallRecordStatus::Missed => Ok(CallStatus::Missed),
        CallRecordStatus::Declined => Ok(CallStatus::Declined),
        CallRecordStatus::Joined => Ok(CallStatus::Joined),
        CallRecordStatus::Pending => Err(ArchiveError::UnsupportedVariant {
            frame_type: "call",
            detail: "call is still pending and has no terminal state".to_string(),
        }),
    }
}

fn status_from_wire(status: CallStatus) -> CallRecordStatus {
    match status {
        CallStatus::Accepted => CallRecordStatus::Accepted,
        CallStatus::Missed => CallRecordStatus::Missed,
        CallStatus::Declined => CallRecordStatus::Declined,
        CallStatus::Joined => CallRecordStatus::Joined,
    }
}

impl FrameArchiver for CallArchiver {
    type Domain = CallRecord;

    fn archive(
        &self,
        record: &CallRecord,
        ctx: &mut ArchiveContext<'_>,
    ) -> Result<Frame, ArchiveError> {
        let conversation_id = ctx.conversation_id_for(&record.conversation_unique_id)?;
        let status = status_to_wire(record.status)?;

        let frame = CallFrame {
            call_id: record.call_id,
            conversation_id,
            kind: record.kind,
            direction: record.direction,
            status,
            started_at_ms: record.started_at_ms,
        };
        debug!(id = %frame.frame_id().log_string(), "archived call record");
        Ok(Frame::Call(frame))
    }

    fn restore(
        &self,
        frame: &Frame,
        ctx: &mut RestoreContext<'_>,
    ) -> Result<CallRecord, ArchiveError> {
        let call = match frame {
            Frame::Call(call) => call,
            other => {
                return Err(ArchiveError::UnexpectedFrameType {
                    expected: "call",
                    got: other.type_name(),
                })
            }
        };

        let conversation_unique_id = ctx.conversation_for(call.conversation_id)?.to_string();
        Ok(CallRecord {
            call_id: call.call_id,
            conversation_unique_id,
            kind: call.kind,
            direction: call.direction,
            status: status_from_wire(call.status),
            started_at_ms: call.started_at_ms,
        })
    }
}
