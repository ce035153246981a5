//! Variable-length Integer Encoding
//!
//! Frame lengths, identifiers, and timestamps are encoded as varints: small
//! values take one byte, larger values take up to ten. Signed values go
//! through ZigZag first (0 → 0, -1 → 1, 1 → 2, ...) so small negatives stay
//! compact.
//!
//! Unlike a write-side-only codec, decoding here is fallible: snapshot bytes
//! come from outside the process, so a truncated buffer or a varint that
//! runs past 64 bits returns an [`Error`](crate::Error) instead of
//! panicking.

use bytes::{Buf, BufMut};

use crate::{Error, Result};

/// Encode an unsigned integer as a varint.
pub fn encode_u64(buf: &mut impl BufMut, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;

        if value != 0 {
            byte |= 0x80; // continuation bit
        }

        buf.put_u8(byte);

        if value == 0 {
            break;
        }
    }
}

/// Encode a signed integer as a ZigZag varint.
pub fn encode_i64(buf: &mut impl BufMut, value: i64) {
    let unsigned = ((value << 1) ^ (value >> 63)) as u64;
    encode_u64(buf, unsigned);
}

/// Decode an unsigned varint.
///
/// Fails with `Truncated` if the buffer ends before the final byte, and
/// with `VarintOverflow` if the encoding runs past 64 bits.
pub fn decode_u64(buf: &mut impl Buf) -> Result<u64> {
    let mut value: u64 = 0;
    let mut shift = 0;

    loop {
        if !buf.has_remaining() {
            return Err(Error::Truncated);
        }
        let byte = buf.get_u8();

        if shift == 63 && byte > 1 {
            return Err(Error::VarintOverflow);
        }
        value |= ((byte & 0x7F) as u64) << shift;

        if (byte & 0x80) == 0 {
            return Ok(value);
        }

        shift += 7;
        if shift >= 64 {
            return Err(Error::VarintOverflow);
        }
    }
}

/// Decode a ZigZag varint to a signed integer.
pub fn decode_i64(buf: &mut impl Buf) -> Result<i64> {
    let unsigned = decode_u64(buf)?;

    let value = (unsigned >> 1) as i64;
    if (unsigned & 1) != 0 {
        Ok(!value)
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn roundtrip_u64(value: u64) -> u64 {
        let mut buf = BytesMut::new();
        encode_u64(&mut buf, value);
        let mut cursor = buf.as_ref();
        let decoded = decode_u64(&mut cursor).unwrap();
        assert_eq!(cursor.len(), 0, "buffer should be fully consumed");
        decoded
    }

    fn roundtrip_i64(value: i64) -> i64 {
        let mut buf = BytesMut::new();
        encode_i64(&mut buf, value);
        let mut cursor = buf.as_ref();
        let decoded = decode_i64(&mut cursor).unwrap();
        assert_eq!(cursor.len(), 0, "buffer should be fully consumed");
        decoded
    }

    #[test]
    fn test_u64_roundtrip_notable_values() {
        for value in [
            0,
            1,
            127,
            128,
            255,
            256,
            16383,
            16384,
            u32::MAX as u64,
            u64::MAX / 2,
            u64::MAX,
        ] {
            assert_eq!(roundtrip_u64(value), value);
        }
    }

    #[test]
    fn test_i64_roundtrip_notable_values() {
        for value in [
            0,
            1,
            -1,
            63,
            -64,
            1_000_000,
            -1_000_000,
            i64::MAX,
            i64::MIN,
        ] {
            assert_eq!(roundtrip_i64(value), value);
        }
    }

    #[test]
    fn test_small_values_are_one_byte() {
        let mut buf = BytesMut::new();
        encode_u64(&mut buf, 127);
        assert_eq!(buf.len(), 1);

        let mut buf = BytesMut::new();
        encode_u64(&mut buf, 128);
        assert_eq!(buf.len(), 2);

        // ZigZag keeps small negatives compact too
        let mut buf = BytesMut::new();
        encode_i64(&mut buf, -1);
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_u64_max_is_ten_bytes() {
        let mut buf = BytesMut::new();
        encode_u64(&mut buf, u64::MAX);
        assert_eq!(buf.len(), 10);
    }

    #[test]
    fn test_decode_empty_buffer_is_truncated() {
        let mut cursor: &[u8] = &[];
        assert!(matches!(decode_u64(&mut cursor), Err(Error::Truncated)));
    }

    #[test]
    fn test_decode_missing_final_byte_is_truncated() {
        // Continuation bit set, then nothing
        let mut cursor: &[u8] = &[0x80];
        assert!(matches!(decode_u64(&mut cursor), Err(Error::Truncated)));

        let mut cursor: &[u8] = &[0xFF, 0xFF];
        assert!(matches!(decode_u64(&mut cursor), Err(Error::Truncated)));
    }

    #[test]
    fn test_decode_overlong_varint_is_overflow() {
        // Eleven continuation bytes cannot fit in 64 bits
        let bytes = [0xFFu8; 11];
        let mut cursor: &[u8] = &bytes;
        assert!(matches!(
            decode_u64(&mut cursor),
            Err(Error::VarintOverflow)
        ));
    }

    #[test]
    fn test_decode_tenth_byte_overflow() {
        // Ten bytes where the tenth carries more than the single remaining bit
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x02];
        let mut cursor: &[u8] = &bytes;
        assert!(matches!(
            decode_u64(&mut cursor),
            Err(Error::VarintOverflow)
        ));
    }

    #[test]
    fn test_sequential_varints_share_a_buffer() {
        let values: Vec<i64> = vec![0, 1, -1, 42, -42, 1_000_000, i64::MAX, i64::MIN];
        let mut buf = BytesMut::new();
        for &v in &values {
            encode_i64(&mut buf, v);
        }
        let mut cursor = buf.as_ref();
        for &expected in &values {
            assert_eq!(decode_i64(&mut cursor).unwrap(), expected);
        }
        assert_eq!(cursor.len(), 0);
    }
}
