// SPDX-License-Identifier: Apache-2.0
//! LSB-first 7-bit-group unsigned varint, used only for SPIR-V word streams.
//!
//! Every other scalar in a blob is fixed-width little-endian; varints exist purely because most
//! SPIR-V words are small and a capture full of shader code compresses meaningfully better this
//! way than at 4 bytes flat.

use crate::error::CodecError;

const CONTINUATION: u8 = 0x80;
const DATA_BITS: u32 = 7;
const DATA_MASK: u8 = 0x7f;
const MAX_BYTES: usize = 5;

/// Encodes a 32-bit word as a varint, appending it to `out`.
///
/// Produces 1 byte for values below `2^7`, growing up to the 5-byte maximum needed for values at
/// or above `2^28` (a `u32`'s top nibble only ever needs 4 of the fifth byte's 7 data bits).
pub fn encode(word: u32, out: &mut Vec<u8>) {
 let mut value = word;
 loop {
 let mut byte = (value as u8) & DATA_MASK;
 value >>= DATA_BITS;
 if value != 0 {
 byte |= CONTINUATION;
 }
 out.push(byte);
 if value == 0 {
 break;
 }
 }
}

/// Decodes a varint from the front of `bytes`, returning the value and the number of bytes
/// consumed.
///
/// # Errors
///
/// Returns [`CodecError::UnexpectedEof`] if the buffer ends before a terminating byte is found,
/// and [`CodecError::VarintOverflow`] if the continuation bit is still set after 5 bytes (more
/// than 32 bits' worth of shift).
pub fn decode(bytes: &[u8]) -> Result<(u32, usize), CodecError> {
 let mut result: u32 = 0;
 let mut shift: u32 = 0;
 for (index, &byte) in bytes.iter().enumerate().take(MAX_BYTES) {
 let data = u32::from(byte & DATA_MASK);
 result |= data.checked_shl(shift).unwrap_or(0);
 shift += DATA_BITS;
 if byte & CONTINUATION == 0 {
 return Ok((result, index + 1));
 }
 if shift >= 32 && index + 1 == MAX_BYTES {
 return Err(CodecError::VarintOverflow { shift });
 }
 }
 if bytes.len() < MAX_BYTES {
 Err(CodecError::UnexpectedEof {
 wanted: MAX_BYTES,
 available: bytes.len(),
 })
 } else {
 Err(CodecError::VarintOverflow { shift })
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn boundary_values_produce_expected_lengths() {
 let cases: [(u32, usize); 10] = [
 (0, 1),
 (127, 1),
 (128, 2),
 (16383, 2),
 (16384, 3),
 (2_097_151, 3),
 (2_097_152, 4),
 (268_435_455, 4),
 (268_435_456, 5),
 (0xffff_ffff, 5),
 ];
 for (word, expected_len) in cases {
 let mut buf = Vec::new();
 encode(word, &mut buf);
 assert_eq!(buf.len(), expected_len, "word {word}");
 let (decoded, consumed) = decode(&buf).unwrap();
 assert_eq!(decoded, word);
 assert_eq!(consumed, buf.len());
 }
 }

 #[test]
 fn rejects_truncated_input() {
 let mut buf = Vec::new();
 encode(0xffff_ffff, &mut buf);
 buf.truncate(buf.len() - 1);
 assert!(matches!(decode(&buf), Err(CodecError::UnexpectedEof { .. })));
 }

 #[test]
 fn rejects_overlong_continuation() {
 let buf = [0x80, 0x80, 0x80, 0x80, 0x80];
 assert!(matches!(decode(&buf), Err(CodecError::VarintOverflow { .. })));
 }

 #[test]
 fn round_trips_every_byte_length_boundary_minus_one_and_plus_one() {
 for word in [126u32, 127, 128, 129, 16382, 16383, 16384, 16385] {
 let mut buf = Vec::new();
 encode(word, &mut buf);
 let (decoded, _) = decode(&buf).unwrap();
 assert_eq!(decoded, word);
 }
 }
}
