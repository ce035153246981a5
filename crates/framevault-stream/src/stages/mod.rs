//! Transform Stages
//!
//! The concrete byte-transform stages composed into a
//! [`TransformPipeline`](crate::TransformPipeline):
//!
//! - [`Lz4Compress`] / [`Lz4Decompress`]: block compression. Plaintext is
//!   cut into fixed 64 KiB blocks; each block is compressed independently
//!   and length-framed, so corruption is isolated per block and decode
//!   never needs the whole stream in memory.
//! - [`AesGcmEncrypt`] / [`AesGcmDecrypt`]: chunked AEAD over AES-256-GCM.
//!   Same fixed block size, per-block nonce derived from a stream nonce and
//!   a block counter.
//! - [`BucketPad`] / [`BucketUnpad`]: pads the logical payload up to a size
//!   bucket so stored attachment sizes leak less; unpad truncates back to
//!   the known plaintext length.
//!
//! All stages share one invariant: their output depends only on the byte
//! sequence, never on how it was chunked. Internal block boundaries fall at
//! fixed byte counts, so any chunk splitting produces identical output.

mod cipher;
mod compress;
mod padding;

pub use cipher::{random_stream_nonce, AesGcmDecrypt, AesGcmEncrypt, KEY_LEN, STREAM_NONCE_LEN};
pub use compress::{Lz4Compress, Lz4Decompress};
pub use padding::{padded_size, BucketPad, BucketUnpad};

/// Plaintext block size shared by the block-oriented stages.
pub const BLOCK_SIZE: usize = 64 * 1024;
