// SPDX-License-Identifier: Apache-2.0
//! The self-describing blob format : `{ tag, format-version, length }` followed
//! by the normalized create-info in the fixed field order the per-object modules define.

use crate::error::CodecError;
use crate::object;
use crate::wire::{Reader, Writer};
use fossilize_model::{NormalizedObject, ResourceTag};

/// The blob format version this build of the codec reads and writes.
///
/// Bump this whenever the masking logic in `fossilize-hash` changes in a way that would make old
/// archives hash differently than they used to — decoders reject anything else rather than silently reinterpreting old bytes.
pub const FORMAT_VERSION: u16 = 1;

/// Encodes a [`NormalizedObject`] as a complete, self-describing blob: header followed by payload.
#[must_use]
pub fn encode_blob(object: &NormalizedObject) -> Vec<u8> {
 let mut payload = Writer::new();
 object::encode(object, &mut payload);
 let payload_bytes = payload.into_bytes();

 let mut w = Writer::new();
 w.u8(object.tag().as_u8());
 w.u32(u32::from(FORMAT_VERSION));
 w.u32(payload_bytes.len() as u32);
 w.raw_bytes(&payload_bytes);
 w.into_bytes()
}

/// Decodes a blob produced by [`encode_blob`].
///
/// # Errors
///
/// [`CodecError::UnknownTag`] for an unrecognized tag byte, [`CodecError::UnsupportedVersion`]
/// for a format version this build doesn't understand, [`CodecError::LengthMismatch`] if the
/// header's declared length doesn't match the bytes actually present, and whatever the
/// per-object decoder returns for a malformed payload.
pub fn decode_blob(bytes: &[u8]) -> Result<NormalizedObject, CodecError> {
 let mut r = Reader::new(bytes);
 let tag_byte = r.u8()?;
 let tag = ResourceTag::try_from_u8(tag_byte).map_err(|_| CodecError::UnknownTag(tag_byte))?;
 let version = r.u32()?;
 if version != u32::from(FORMAT_VERSION) {
 return Err(CodecError::UnsupportedVersion {
 found: version as u16,
 expected: FORMAT_VERSION,
 });
 }
 let declared_len = r.u32()?;
 if declared_len as usize != r.remaining() {
 return Err(CodecError::LengthMismatch {
 declared: declared_len,
 actual: r.remaining() as u32,
 });
 }
 let object = object::decode(tag, &mut r)?;
 if r.remaining() != 0 {
 return Err(CodecError::TrailingGarbage {
 context: "blob payload",
 trailing: r.remaining(),
 });
 }
 Ok(object)
}
