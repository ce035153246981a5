//! LZ4 Block Compression Stages
//!
//! Plaintext accumulates in a 64 KiB block buffer; every full block is
//! compressed independently and emitted as a length-framed record:
//!
//! ```text
//! ┌──────────────────┬─────────────────────────────────────┐
//! │ u32-le wire len  │ lz4 block (size-prepended encoding) │
//! └──────────────────┴─────────────────────────────────────┘
//! ```
//!
//! `finalize` flushes the trailing partial block. Block boundaries fall at
//! fixed byte counts, so the output never depends on chunk splitting.
//!
//! The decompress stage reassembles records across arbitrary chunk splits.
//! A record that fails lz4 decoding, an oversized wire length, or bytes
//! left over at finalize all fail with a typed error naming the stage.

use crate::error::TransformError;
use crate::transform::StreamTransform;

use super::BLOCK_SIZE;

const STAGE_COMPRESS: &str = "lz4-compress";
const STAGE_DECOMPRESS: &str = "lz4-decompress";

/// Largest wire record a well-formed stream can produce: the lz4 worst case
/// for one block plus its 4-byte size prefix.
fn max_wire_record() -> usize {
    lz4_flex::block::get_maximum_output_size(BLOCK_SIZE) + 4
}

/// Compression stage.
#[derive(Default)]
pub struct Lz4Compress {
    block: Vec<u8>,
}

impl Lz4Compress {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit_block(&mut self, out: &mut Vec<u8>, block: &[u8]) {
        let compressed = lz4_flex::compress_prepend_size(block);
        out.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
        out.extend_from_slice(&compressed);
    }
}

impl StreamTransform for Lz4Compress {
    fn name(&self) -> &'static str {
        STAGE_COMPRESS
    }

    fn process(&mut self, chunk: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.block.extend_from_slice(chunk);

        let mut out = Vec::new();
        while self.block.len() >= BLOCK_SIZE {
            let rest = self.block.split_off(BLOCK_SIZE);
            let full = std::mem::replace(&mut self.block, rest);
            self.emit_block(&mut out, &full);
        }
        Ok(out)
    }

    fn finalize(&mut self) -> Result<Vec<u8>, TransformError> {
        let mut out = Vec::new();
        if !self.block.is_empty() {
            let block = std::mem::take(&mut self.block);
            self.emit_block(&mut out, &block);
        }
        Ok(out)
    }
}

/// Decompression stage, the mirror of [`Lz4Compress`].
#[derive(Default)]
pub struct Lz4Decompress {
    pending: Vec<u8>,
}

impl Lz4Decompress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StreamTransform for Lz4Decompress {
    fn name(&self) -> &'static str {
        STAGE_DECOMPRESS
    }

    fn process(&mut self, chunk: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.pending.extend_from_slice(chunk);

        let mut out = Vec::new();
        loop {
            if self.pending.len() < 4 {
                return Ok(out);
            }
            let wire_len =
                u32::from_le_bytes([
                    self.pending[0],
                    self.pending[1],
                    self.pending[2],
                    self.pending[3],
                ]) as usize;

            if wire_len + 4 > max_wire_record() {
                return Err(TransformError::corrupt(
                    STAGE_DECOMPRESS,
                    format!("wire record of {} bytes exceeds block limit", wire_len),
                ));
            }
            if self.pending.len() < 4 + wire_len {
                return Ok(out);
            }

            let record = &self.pending[4..4 + wire_len];
            let block = lz4_flex::decompress_size_prepended(record)
                .map_err(|e| TransformError::corrupt(STAGE_DECOMPRESS, e.to_string()))?;
            if block.len() > BLOCK_SIZE {
                return Err(TransformError::corrupt(
                    STAGE_DECOMPRESS,
                    format!("decompressed block of {} bytes exceeds block size", block.len()),
                ));
            }
            out.extend_from_slice(&block);
            self.pending.drain(..4 + wire_len);
        }
    }

    fn finalize(&mut self) -> Result<Vec<u8>, TransformError> {
        if !self.pending.is_empty() {
            return Err(TransformError::truncated(STAGE_DECOMPRESS));
        }
        Ok(Vec::new())
    }
}
