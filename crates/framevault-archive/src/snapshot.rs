//! Snapshot Container
//!
//! The on-wire layout of one backup snapshot:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Header (8 bytes, untransformed)             │
//! │   magic "FVLT" (4) │ version u16 │ reserved │
//! ├─────────────────────────────────────────────┤
//! │ Body (transformed by the pipeline)          │
//! │   repeated: varint frame length │ frame     │
//! ├─────────────────────────────────────────────┤
//! │ Footer (12 bytes, untransformed)            │
//! │   frame count u32 │ crc32 u32 │ magic again │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The CRC covers everything before it (header, transformed body, frame
//! count), so any flipped byte in the container is caught before frame
//! parsing starts. The trailing magic catches truncation that happens to
//! land on a plausible length.
//!
//! Writing is all-or-nothing per frame: a frame that fails validation or
//! transformation produces no output and the export must be abandoned.
//! Reading validates the container shell first, then runs the body through
//! the mirrored pipeline, then parses and validates every frame, and
//! finally checks the parsed count against the footer.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use tracing::debug;

use framevault_core::{varint, Frame};
use framevault_stream::{read_to_end, StreamSink, StreamSource, TransformPipeline};

use crate::error::ArchiveError;

/// Container magic, at both ends of the snapshot.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"FVLT";
/// Current container version.
pub const SNAPSHOT_VERSION: u16 = 1;

const HEADER_LEN: usize = 8;
const FOOTER_LEN: usize = 12;

/// Chunk size for pushing the body through the decode pipeline.
const READ_CHUNK: usize = 64 * 1024;

/// Summary of a written or parsed snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub frame_count: u32,
    /// Total container size, header and footer included.
    pub total_bytes: u64,
    pub crc32: u32,
}

/// Writes frames into a snapshot container through a transform pipeline.
pub struct SnapshotWriter<S: StreamSink> {
    sink: S,
    pipeline: TransformPipeline,
    hasher: Hasher,
    frame_count: u32,
    bytes_written: u64,
}

impl<S: StreamSink> SnapshotWriter<S> {
    /// Open a writer and emit the header. The pipeline transforms the body
    /// only; header and footer stay readable without it.
    pub fn new(mut sink: S, pipeline: TransformPipeline) -> Result<Self, ArchiveError> {
        let mut header = BytesMut::with_capacity(HEADER_LEN);
        header.put_slice(&SNAPSHOT_MAGIC);
        header.put_u16_le(SNAPSHOT_VERSION);
        header.put_u16_le(0); // reserved

        let mut hasher = Hasher::new();
        hasher.update(&header);
        sink.write(&header)?;

        Ok(Self {
            sink,
            pipeline,
            hasher,
            frame_count: 0,
            bytes_written: HEADER_LEN as u64,
        })
    }

    fn emit(&mut self, bytes: &[u8]) -> Result<(), ArchiveError> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.hasher.update(bytes);
        self.sink.write(bytes)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    /// Append one frame. Validates, encodes with a varint length prefix,
    /// and pushes the result through the pipeline.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<(), ArchiveError> {
        frame.validate()?;

        let mut encoded = BytesMut::new();
        frame.encode(&mut encoded);

        let mut framed = BytesMut::with_capacity(encoded.len() + 10);
        varint::encode_u64(&mut framed, encoded.len() as u64);
        framed.extend_from_slice(&encoded);

        let out = self.pipeline.process(&framed)?;
        self.emit(&out)?;
        self.frame_count += 1;
        debug!(
            frame_type = frame.type_name(),
            count = self.frame_count,
            "wrote snapshot frame"
        );
        Ok(())
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Flush the pipeline, write the footer, and finish the sink.
    pub fn finish(mut self) -> Result<(S, SnapshotInfo), ArchiveError> {
        let trailing = self.pipeline.finalize()?;
        self.emit(&trailing)?;

        // Frame count is covered by the CRC; the CRC field and trailing
        // magic are not.
        let count_bytes = self.frame_count.to_le_bytes();
        self.hasher.update(&count_bytes);
        let crc = self.hasher.finalize();

        let mut footer = BytesMut::with_capacity(FOOTER_LEN);
        footer.put_slice(&count_bytes);
        footer.put_u32_le(crc);
        footer.put_slice(&SNAPSHOT_MAGIC);
        self.sink.write(&footer)?;
        self.bytes_written += FOOTER_LEN as u64;

        self.sink.finish()?;
        let info = SnapshotInfo {
            frame_count: self.frame_count,
            total_bytes: self.bytes_written,
            crc32: crc,
        };
        debug!(
            frames = info.frame_count,
            bytes = info.total_bytes,
            "snapshot finished"
        );
        Ok((self.sink, info))
    }
}

/// Reads and validates a snapshot container.
pub struct SnapshotReader;

impl SnapshotReader {
    /// Drain a source and parse the snapshot it holds.
    pub fn read(
        source: &mut dyn StreamSource,
        pipeline: TransformPipeline,
    ) -> Result<(Vec<Frame>, SnapshotInfo), ArchiveError> {
        let data = read_to_end(source)?;
        Self::parse(&data, pipeline)
    }

    /// Parse a snapshot held in memory. `pipeline` must mirror the encode
    /// pipeline the writer used, stage for stage in reverse.
    pub fn parse(
        data: &[u8],
        mut pipeline: TransformPipeline,
    ) -> Result<(Vec<Frame>, SnapshotInfo), ArchiveError> {
        if data.len() < HEADER_LEN + FOOTER_LEN {
            return Err(framevault_core::Error::Truncated.into());
        }
        if data[..4] != SNAPSHOT_MAGIC {
            return Err(framevault_core::Error::InvalidMagic.into());
        }
        let version = u16::from_le_bytes([data[4], data[5]]);
        if version != SNAPSHOT_VERSION {
            return Err(framevault_core::Error::UnsupportedVersion(version).into());
        }

        let footer = &data[data.len() - FOOTER_LEN..];
        if footer[8..] != SNAPSHOT_MAGIC {
            return Err(framevault_core::Error::InvalidMagic.into());
        }
        let expected_count = u32::from_le_bytes([footer[0], footer[1], footer[2], footer[3]]);
        let expected_crc = u32::from_le_bytes([footer[4], footer[5], footer[6], footer[7]]);

        // CRC covers header, body, and the frame count field.
        let mut hasher = Hasher::new();
        hasher.update(&data[..data.len() - 8]);
        let actual_crc = hasher.finalize();
        if actual_crc != expected_crc {
            return Err(framevault_core::Error::CrcMismatch.into());
        }

        let body = &data[HEADER_LEN..data.len() - FOOTER_LEN];
        let mut decoded = Vec::new();
        for chunk in body.chunks(READ_CHUNK) {
            decoded.extend(pipeline.process(chunk)?);
        }
        decoded.extend(pipeline.finalize()?);

        let mut frames = Vec::new();
        let mut cursor = Bytes::from(decoded);
        while cursor.has_remaining() {
            let len = varint::decode_u64(&mut cursor)? as usize;
            if cursor.remaining() < len {
                return Err(framevault_core::Error::Truncated.into());
            }
            let mut frame_bytes = cursor.split_to(len);
            let frame = Frame::decode(&mut frame_bytes)?;
            if frame_bytes.has_remaining() {
                return Err(framevault_core::Error::InvalidField {
                    field: "frame",
                    reason: "trailing bytes after frame".to_string(),
                }
                .into());
            }
            frame.validate()?;
            frames.push(frame);
        }

        let found = frames.len() as u32;
        if found != expected_count {
            return Err(ArchiveError::FrameCountMismatch {
                expected: expected_count,
                found,
            });
        }

        let info = SnapshotInfo {
            frame_count: found,
            total_bytes: data.len() as u64,
            crc32: actual_crc,
        };
        debug!(frames = info.frame_count, "snapshot parsed");
        Ok((frames, info))
    }
}
