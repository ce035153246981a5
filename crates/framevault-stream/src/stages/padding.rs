//! Size-Bucket Padding Stages
//!
//! Stored attachment sizes leak information about their content. Padding
//! rounds every payload up to the next size bucket so many different
//! plaintexts share one stored size.
//!
//! Buckets follow the original export format's curve:
//!
//! ```text
//! padded_size(n) = max(541, floor(1.05 ^ ceil(log_1.05(n))))
//! ```
//!
//! so buckets grow by 5% steps with a 541-byte floor.
//!
//! [`BucketPad`] passes data through, counts it, and appends zero bytes at
//! finalize. [`BucketUnpad`] is constructed with the known plaintext length
//! (attachment-bearing frames carry it as metadata) and truncates back,
//! failing if the stream ends short of that length. Keeping the length in
//! frame metadata instead of a trailer lets unpadding stay streaming: no
//! hold-back buffer, no look-ahead.

use crate::error::TransformError;
use crate::transform::StreamTransform;

const STAGE_PAD: &str = "bucket-pad";
const STAGE_UNPAD: &str = "bucket-unpad";

/// The bucket floor: no padded payload is smaller than this.
const MIN_PADDED_SIZE: u64 = 541;

/// The smallest bucket size that can hold `n` bytes.
pub fn padded_size(n: u64) -> u64 {
    if n <= MIN_PADDED_SIZE {
        return MIN_PADDED_SIZE;
    }
    let exponent = (n as f64).log(1.05).ceil();
    let padded = 1.05f64.powf(exponent).floor() as u64;
    padded.max(n)
}

/// Padding stage: zero-fill up to the payload's bucket at finalize.
#[derive(Default)]
pub struct BucketPad {
    written: u64,
}

impl BucketPad {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StreamTransform for BucketPad {
    fn name(&self) -> &'static str {
        STAGE_PAD
    }

    fn process(&mut self, chunk: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.written += chunk.len() as u64;
        Ok(chunk.to_vec())
    }

    fn finalize(&mut self) -> Result<Vec<u8>, TransformError> {
        let target = padded_size(self.written);
        let fill = (target - self.written) as usize;
        Ok(vec![0u8; fill])
    }
}

/// Unpadding stage: emit the first `plaintext_length` bytes, swallow the
/// rest.
pub struct BucketUnpad {
    plaintext_length: u64,
    emitted: u64,
}

impl BucketUnpad {
    pub fn new(plaintext_length: u64) -> Self {
        Self {
            plaintext_length,
            emitted: 0,
        }
    }
}

impl StreamTransform for BucketUnpad {
    fn name(&self) -> &'static str {
        STAGE_UNPAD
    }

    fn process(&mut self, chunk: &[u8]) -> Result<Vec<u8>, TransformError> {
        let remaining = self.plaintext_length - self.emitted;
        let take = (chunk.len() as u64).min(remaining) as usize;
        self.emitted += take as u64;
        Ok(chunk[..take].to_vec())
    }

    fn finalize(&mut self) -> Result<Vec<u8>, TransformError> {
        if self.emitted < self.plaintext_length {
            return Err(TransformError::truncated(STAGE_UNPAD));
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformErrorKind;
    use crate::transform::{transform_all, TransformPipeline};

    #[test]
    fn test_padded_size_floor() {
        assert_eq!(padded_size(0), 541);
        assert_eq!(padded_size(1), 541);
        assert_eq!(padded_size(541), 541);
    }

    #[test]
    fn test_padded_size_never_shrinks() {
        for n in [542u64, 1000, 4096, 100_000, 10_000_000] {
            assert!(padded_size(n) >= n, "bucket for {} is too small", n);
        }
    }

    #[test]
    fn test_padded_size_is_monotonic() {
        let mut last = 0;
        for n in (0..200_000u64).step_by(997) {
            let p = padded_size(n);
            assert!(p >= last, "padded_size not monotonic at {}", n);
            last = p;
        }
    }

    #[test]
    fn test_padded_size_buckets_collapse_nearby_sizes() {
        // Sizes within one 5% step land in the same bucket
        let a = padded_size(10_000);
        let b = padded_size(10_100);
        assert_eq!(a, b);
    }

    #[test]
    fn test_pad_fills_to_bucket() {
        let payload = vec![5u8; 1000];
        let mut pipeline = TransformPipeline::new(vec![Box::new(BucketPad::new())]);
        let padded = transform_all(&mut pipeline, &payload).unwrap();

        assert_eq!(padded.len() as u64, padded_size(1000));
        assert_eq!(&padded[..1000], payload.as_slice());
        assert!(padded[1000..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_unpad_truncates_to_known_length() {
        let payload: Vec<u8> = (0..1000).map(|i| (i % 255) as u8 + 1).collect();
        let mut pad = TransformPipeline::new(vec![Box::new(BucketPad::new())]);
        let padded = transform_all(&mut pad, &payload).unwrap();

        let mut unpad = TransformPipeline::new(vec![Box::new(BucketUnpad::new(1000))]);
        let back = transform_all(&mut unpad, &padded).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_unpad_roundtrip_across_chunk_splits() {
        let payload = vec![9u8; 5000];
        let mut pad = TransformPipeline::new(vec![Box::new(BucketPad::new())]);
        let padded = transform_all(&mut pad, &payload).unwrap();

        for chunk_size in [1usize, 7, 512, 4999] {
            let mut stage = BucketUnpad::new(5000);
            let mut back = Vec::new();
            for chunk in padded.chunks(chunk_size) {
                back.extend(stage.process(chunk).unwrap());
            }
            stage.finalize().unwrap();
            assert_eq!(back, payload, "chunk size {} broke unpadding", chunk_size);
        }
    }

    #[test]
    fn test_unpad_short_stream_is_truncated() {
        let mut stage = BucketUnpad::new(100);
        let _ = stage.process(&[1u8; 40]).unwrap();
        let err = stage.finalize().unwrap_err();
        assert_eq!(err.stage, "bucket-unpad");
        assert!(matches!(err.kind, TransformErrorKind::TruncatedInput));
    }

    #[test]
    fn test_empty_payload_pads_to_floor() {
        let mut pipeline = TransformPipeline::new(vec![Box::new(BucketPad::new())]);
        let padded = transform_all(&mut pipeline, &[]).unwrap();
        assert_eq!(padded.len(), 541);

        let mut unpad = TransformPipeline::new(vec![Box::new(BucketUnpad::new(0))]);
        assert_eq!(transform_all(&mut unpad, &padded).unwrap(), Vec::<u8>::new());
    }
}
