// SPDX-License-Identifier: Apache-2.0
//! Codec-local error type — the `ParseError` branch of spec.md §7's taxonomy.

/// Everything that can go wrong decoding a blob.
///
/// This crate never panics on malformed input; every rejection, from a bad magic to trailing
/// garbage after a varint, comes back through this enum so a caller streaming an archive can
/// decide whether to abort the whole scan or skip one bad record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
 /// The byte stream ended before the declared payload did.
 #[error("unexpected end of input: wanted {wanted} bytes, had {available}")]
 UnexpectedEof {
 /// Bytes the decoder needed.
 wanted: usize,
 /// Bytes actually remaining.
 available: usize,
 },
 /// A resource-tag byte didn't match any known [`fossilize_model::ResourceTag`].
 #[error("unknown resource tag byte {0}")]
 UnknownTag(u8),
 /// A `pNext` struct-type-tag didn't match any known extension.
 #[error("unknown extension struct-type-tag {0}")]
 UnknownExtensionTag(u32),
 /// A dynamic-state enumerant didn't match any known [`fossilize_model::DynamicState`].
 #[error("unknown dynamic state value {0}")]
 UnknownDynamicState(u32),
 /// A varint's continuation bit stayed set past the 5-byte / 32-bit limit.
 #[error("varint accumulated shift {shift} exceeds 32 bits")]
 VarintOverflow {
 /// The shift that would have been applied had decoding continued.
 shift: u32,
 },
 /// Decoded bytes remained after the value they encoded was fully consumed.
 #[error("{context}: {trailing} trailing byte(s) after decoded value")]
 TrailingGarbage {
 /// What was being decoded when the excess was noticed.
 context: &'static str,
 /// Number of leftover bytes.
 trailing: usize,
 },
 /// A string field's bytes were not valid UTF-8.
 #[error("field is not valid UTF-8")]
 InvalidUtf8,
 /// The blob header's format version does not match what this codec understands.
 #[error("unsupported blob format version {found}, expected {expected}")]
 UnsupportedVersion {
 /// Version actually present.
 found: u16,
 /// Version this codec supports.
 expected: u16,
 },
 /// The blob header's declared length did not match the payload actually present.
 #[error("blob header declares length {declared}, payload has {actual}")]
 LengthMismatch {
 /// Declared length.
 declared: u32,
 /// Actual length.
 actual: u32,
 },
}
