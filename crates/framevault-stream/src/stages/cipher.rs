//! AES-256-GCM Encryption Stages
//!
//! Chunked AEAD: plaintext is cut into fixed 64 KiB blocks and each block
//! is sealed independently, so decode can authenticate and release data
//! block by block instead of holding the whole payload.
//!
//! ## Wire Layout
//!
//! ```text
//! ┌────────────────────────┐
//! │ stream nonce (4 bytes) │  emitted once, before the first block
//! ├────────────────────────┤
//! │ u32-le len │ sealed block (ciphertext + 16-byte tag)
//! ├────────────────────────┤
//! │ u32-le len │ sealed block
//! │ ...                    │
//! └────────────────────────┘
//! ```
//!
//! Per-block nonce = stream nonce (4 bytes) || block counter (8 bytes,
//! big-endian). The counter makes reordered or duplicated blocks fail
//! authentication; the stream nonce keeps nonces unique across streams that
//! share a key.
//!
//! The stream nonce is a constructor argument so a stage's output is fully
//! determined by its configuration; [`random_stream_nonce`] is the normal
//! way to pick one per stream.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::RngCore;

use crate::error::TransformError;
use crate::transform::StreamTransform;

use super::BLOCK_SIZE;

const STAGE_ENCRYPT: &str = "aes-gcm-encrypt";
const STAGE_DECRYPT: &str = "aes-gcm-decrypt";

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// Length of the per-stream nonce prefix.
pub const STREAM_NONCE_LEN: usize = 4;

const TAG_LEN: usize = 16;

/// Pick a fresh stream nonce. One per logical stream.
pub fn random_stream_nonce() -> [u8; STREAM_NONCE_LEN] {
    let mut nonce = [0u8; STREAM_NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    nonce
}

fn block_nonce(stream_nonce: &[u8; STREAM_NONCE_LEN], counter: u64) -> [u8; 12] {
    let mut nonce = [0u8; 12];
    nonce[..STREAM_NONCE_LEN].copy_from_slice(stream_nonce);
    nonce[STREAM_NONCE_LEN..].copy_from_slice(&counter.to_be_bytes());
    nonce
}

/// Encryption stage.
pub struct AesGcmEncrypt {
    cipher: Aes256Gcm,
    stream_nonce: [u8; STREAM_NONCE_LEN],
    counter: u64,
    block: Vec<u8>,
    header_emitted: bool,
}

impl AesGcmEncrypt {
    pub fn new(key: &[u8; KEY_LEN], stream_nonce: [u8; STREAM_NONCE_LEN]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
            stream_nonce,
            counter: 0,
            block: Vec::with_capacity(BLOCK_SIZE),
            header_emitted: false,
        }
    }

    fn seal_block(&mut self, out: &mut Vec<u8>, plaintext: &[u8]) -> Result<(), TransformError> {
        let nonce = block_nonce(&self.stream_nonce, self.counter);
        self.counter = self
            .counter
            .checked_add(1)
            .ok_or_else(|| TransformError::unsupported(STAGE_ENCRYPT, "block counter exhausted"))?;

        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| TransformError::corrupt(STAGE_ENCRYPT, "seal failed"))?;

        out.extend_from_slice(&(sealed.len() as u32).to_le_bytes());
        out.extend_from_slice(&sealed);
        Ok(())
    }

    fn emit_header(&mut self, out: &mut Vec<u8>) {
        if !self.header_emitted {
            out.extend_from_slice(&self.stream_nonce);
            self.header_emitted = true;
        }
    }
}

impl StreamTransform for AesGcmEncrypt {
    fn name(&self) -> &'static str {
        STAGE_ENCRYPT
    }

    fn process(&mut self, chunk: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.block.extend_from_slice(chunk);

        let mut out = Vec::new();
        while self.block.len() >= BLOCK_SIZE {
            self.emit_header(&mut out);
            let rest = self.block.split_off(BLOCK_SIZE);
            let full = std::mem::replace(&mut self.block, rest);
            self.seal_block(&mut out, &full)?;
        }
        Ok(out)
    }

    fn finalize(&mut self) -> Result<Vec<u8>, TransformError> {
        let mut out = Vec::new();
        self.emit_header(&mut out);
        if !self.block.is_empty() {
            let block = std::mem::take(&mut self.block);
            self.seal_block(&mut out, &block)?;
        }
        Ok(out)
    }
}

/// Decryption stage, the mirror of [`AesGcmEncrypt`]. Reads the stream
/// nonce from the wire, so only the key is configuration.
pub struct AesGcmDecrypt {
    cipher: Aes256Gcm,
    stream_nonce: Option<[u8; STREAM_NONCE_LEN]>,
    counter: u64,
    pending: Vec<u8>,
}

impl AesGcmDecrypt {
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
            stream_nonce: None,
            counter: 0,
            pending: Vec::new(),
        }
    }
}

impl StreamTransform for AesGcmDecrypt {
    fn name(&self) -> &'static str {
        STAGE_DECRYPT
    }

    fn process(&mut self, chunk: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.pending.extend_from_slice(chunk);

        let mut out = Vec::new();

        if self.stream_nonce.is_none() {
            if self.pending.len() < STREAM_NONCE_LEN {
                return Ok(out);
            }
            let mut nonce = [0u8; STREAM_NONCE_LEN];
            nonce.copy_from_slice(&self.pending[..STREAM_NONCE_LEN]);
            self.stream_nonce = Some(nonce);
            self.pending.drain(..STREAM_NONCE_LEN);
        }

        let stream_nonce = self.stream_nonce.expect("set above");
        loop {
            if self.pending.len() < 4 {
                return Ok(out);
            }
            let sealed_len =
                u32::from_le_bytes([
                    self.pending[0],
                    self.pending[1],
                    self.pending[2],
                    self.pending[3],
                ]) as usize;

            if sealed_len > BLOCK_SIZE + TAG_LEN || sealed_len < TAG_LEN {
                return Err(TransformError::corrupt(
                    STAGE_DECRYPT,
                    format!("sealed block of {} bytes is outside valid range", sealed_len),
                ));
            }
            if self.pending.len() < 4 + sealed_len {
                return Ok(out);
            }

            let nonce = block_nonce(&stream_nonce, self.counter);
            let sealed = &self.pending[4..4 + sealed_len];
            let block = self
                .cipher
                .decrypt(Nonce::from_slice(&nonce), sealed)
                .map_err(|_| {
                    TransformError::corrupt(STAGE_DECRYPT, "authentication failed")
                })?;
            self.counter += 1;

            out.extend_from_slice(&block);
            self.pending.drain(..4 + sealed_len);
        }
    }

    fn finalize(&mut self) -> Result<Vec<u8>, TransformError> {
        if self.stream_nonce.is_none() || !self.pending.is_empty() {
            return Err(TransformError::truncated(STAGE_DECRYPT));
        }
        Ok(Vec::new())
    }
}
