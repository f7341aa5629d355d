//! HPACK integer and string primitives (RFC 7541 §5).

use bytes::{Buf, BufMut, BytesMut};

use super::huffman;
use super::DecoderError;

/// Encodes `value` using an N-bit prefix (`prefix_bits` in `1..=8`).
/// `dst`'s last byte (if any bits of the prefix octet were already
/// written by the caller, e.g. a representation-type tag) is ORed with
/// the low bits of the first octet; callers that haven't written
/// anything yet should push a `0` placeholder byte first.
pub fn encode_int(mut value: u64, prefix_bits: u8, first_byte_high_bits: u8, dst: &mut BytesMut) {
    let max_prefix = (1u64 << prefix_bits) - 1;

    if value < max_prefix {
        dst.put_u8(first_byte_high_bits | value as u8);
        return;
    }

    dst.put_u8(first_byte_high_bits | max_prefix as u8);
    value -= max_prefix;

    while value >= 128 {
        dst.put_u8(((value % 128) as u8) | 0x80);
        value /= 128;
    }
    dst.put_u8(value as u8);
}

/// Decodes an integer with an N-bit prefix from `src`, where `src`'s
/// first byte still contains the prefix bits (the caller has not yet
/// advanced past it). Advances `src` past the whole representation.
pub fn decode_int(src: &mut impl Buf, prefix_bits: u8) -> Result<u64, DecoderError> {
    if !src.has_remaining() {
        return Err(DecoderError::NeedMore);
    }
    let max_prefix = (1u64 << prefix_bits) - 1;
    let first = (src.get_u8() as u64) & max_prefix;

    if first < max_prefix {
        return Ok(first);
    }

    let mut value = max_prefix;
    let mut shift = 0u32;
    loop {
        if !src.has_remaining() {
            return Err(DecoderError::NeedMore);
        }
        let byte = src.get_u8();
        let more = byte & 0x80 != 0;
        let digit = (byte & 0x7f) as u64;

        let add = digit
            .checked_shl(shift)
            .ok_or(DecoderError::IntegerOverflow)?;
        value = value.checked_add(add).ok_or(DecoderError::IntegerOverflow)?;

        if !more {
            return Ok(value);
        }
        shift += 7;
        if shift >= 64 {
            return Err(DecoderError::IntegerOverflow);
        }
    }
}

/// Encodes a string literal: 1-bit Huffman flag, length on a 7-bit
/// prefix, then the (possibly Huffman-coded) octets. Huffman coding is
/// used whenever it is not larger than the literal representation.
pub fn encode_string(value: &[u8], dst: &mut BytesMut) {
    let huff_len = huffman::encoded_len(value);

    if huff_len < value.len() {
        encode_int(huff_len as u64, 7, 0x80, dst);
        huffman::encode(value, dst);
    } else {
        encode_int(value.len() as u64, 7, 0x00, dst);
        dst.extend_from_slice(value);
    }
}

/// Decodes a string literal, allocating its own buffer (the "caller
/// supplied arena" of spec §4.3 is, in this crate, simply the allocator
/// — see DESIGN.md for why a bump arena was not reintroduced).
pub fn decode_string(src: &mut impl Buf) -> Result<Vec<u8>, DecoderError> {
    if !src.has_remaining() {
        return Err(DecoderError::NeedMore);
    }
    let first = src.chunk()[0];
    let is_huffman = first & 0x80 != 0;
    let len = decode_int(src, 7)? as usize;

    if src.remaining() < len {
        return Err(DecoderError::NeedMore);
    }
    let mut buf = vec![0u8; len];
    src.copy_to_slice(&mut buf);

    if is_huffman {
        huffman::decode(&buf)
    } else {
        Ok(buf)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn integer_round_trip_small_and_large() {
        for prefix in 1u8..=8 {
            for &n in &[0u64, 1, 30, 127, 128, 1000, 1 << 20, (1u64 << 40) + 7] {
                let mut buf = BytesMut::new();
                encode_int(n, prefix, 0, &mut buf);
                let mut cur = Cursor::new(&buf[..]);
                let decoded = decode_int(&mut cur, prefix).unwrap();
                assert_eq!(decoded, n, "prefix={prefix} n={n}");
            }
        }
    }

    #[test]
    fn integer_round_trip_exhaustive_small_range() {
        for prefix in 1u8..=8 {
            for n in 0u64..4096 {
                let mut buf = BytesMut::new();
                encode_int(n, prefix, 0, &mut buf);
                let mut cur = Cursor::new(&buf[..]);
                assert_eq!(decode_int(&mut cur, prefix).unwrap(), n);
            }
        }
    }

    #[test]
    fn truncated_integer_needs_more() {
        let mut buf = BytesMut::new();
        encode_int(1_000_000, 5, 0, &mut buf);
        buf.truncate(buf.len() - 1);
        let mut cur = Cursor::new(&buf[..]);
        assert!(matches!(decode_int(&mut cur, 5), Err(DecoderError::NeedMore)));
    }

    #[test]
    fn string_round_trip_with_and_without_huffman() {
        for s in ["", "a", "www.example.com", "this is not very compressible :) {}[]"] {
            let mut buf = BytesMut::new();
            encode_string(s.as_bytes(), &mut buf);
            let mut cur = Cursor::new(&buf[..]);
            let decoded = decode_string(&mut cur).unwrap();
            assert_eq!(decoded, s.as_bytes());
        }
    }
}
