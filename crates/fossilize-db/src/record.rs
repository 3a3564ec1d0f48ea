// SPDX-License-Identifier: Apache-2.0
//! On-disk framing for a single archive entry.
//!
//! Every record is `[header][payload bytes]`. The header is fixed-size and entirely
//! self-describing: a scanner never needs to look past it to know how many bytes the payload
//! occupies, whether it's compressed, and whether its checksum has already been verified.

use fossilize_model::{Hash, ResourceTag};

use crate::error::DbError;

/// The payload bytes on disk are deflate-compressed; [`RecordHeader::uncompressed_size`] gives
/// the size after inflating.
pub const FLAG_COMPRESSED: u8 = 1 << 0;

/// The payload's [`RecordHeader::crc32`] has been verified against its stored bytes at least
/// once (set by [`crate::Archive::write_entry`] for anything it writes itself; cleared for
/// records merged in from elsewhere until they're re-verified).
pub const FLAG_CHECKSUM_VALID: u8 = 1 << 1;

/// Fixed size in bytes of a [`RecordHeader`] on disk: 1 (tag) + 8 (hash) + 4 (stored_size)
/// + 4 (uncompressed_size) + 4 (crc32) + 1 (flags).
pub const RECORD_HEADER_LEN: usize = 22;

/// The fixed-size prefix of every archive record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordHeader {
 /// Which kind of object this record holds.
 pub tag: ResourceTag,
 /// Content fingerprint of the encoded object this record holds.
 pub hash: Hash,
 /// Length in bytes of the payload as stored on disk (after compression, if any).
 pub stored_size: u32,
 /// Length in bytes of the payload once inflated. Equal to `stored_size` when
 /// [`FLAG_COMPRESSED`] is unset.
 pub uncompressed_size: u32,
 /// CRC32 of the stored (possibly compressed) payload bytes.
 pub crc32: u32,
 /// Bitwise OR of `FLAG_*` constants.
 pub flags: u8,
}

impl RecordHeader {
 /// `true` if the stored payload is deflate-compressed.
 #[must_use]
 pub const fn is_compressed(&self) -> bool {
 self.flags & FLAG_COMPRESSED != 0
 }

 /// Serializes this header to its fixed on-disk layout.
 #[must_use]
 pub fn encode(&self) -> [u8; RECORD_HEADER_LEN] {
 let mut bytes = [0u8; RECORD_HEADER_LEN];
 bytes[0] = self.tag.as_u8();
 bytes[1..9].copy_from_slice(&self.hash.to_le_bytes());
 bytes[9..13].copy_from_slice(&self.stored_size.to_le_bytes());
 bytes[13..17].copy_from_slice(&self.uncompressed_size.to_le_bytes());
 bytes[17..21].copy_from_slice(&self.crc32.to_le_bytes());
 bytes[21] = self.flags;
 bytes
 }

 /// Parses a header from its fixed on-disk layout.
 ///
 /// # Errors
 ///
 /// Returns [`DbError::UnknownTag`] if the tag byte is outside the closed
 /// [`ResourceTag`] set.
 pub fn decode(bytes: &[u8; RECORD_HEADER_LEN]) -> Result<Self, DbError> {
 let tag = ResourceTag::try_from_u8(bytes[0]).map_err(|e| DbError::UnknownTag { tag: e.0 })?;
 let mut hash_bytes = [0u8; 8];
 hash_bytes.copy_from_slice(&bytes[1..9]);
 let hash = Hash::from_le_bytes(hash_bytes);

 let mut stored_size_bytes = [0u8; 4];
 stored_size_bytes.copy_from_slice(&bytes[9..13]);
 let stored_size = u32::from_le_bytes(stored_size_bytes);

 let mut uncompressed_size_bytes = [0u8; 4];
 uncompressed_size_bytes.copy_from_slice(&bytes[13..17]);
 let uncompressed_size = u32::from_le_bytes(uncompressed_size_bytes);

 let mut crc32_bytes = [0u8; 4];
 crc32_bytes.copy_from_slice(&bytes[17..21]);
 let crc32 = u32::from_le_bytes(crc32_bytes);

 let flags = bytes[21];
 Ok(Self {
 tag,
 hash,
 stored_size,
 uncompressed_size,
 crc32,
 flags,
 })
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn round_trips_through_encode_decode() {
 let header = RecordHeader {
 tag: ResourceTag::GraphicsPipeline,
 hash: 0xdead_beef_cafe_babe,
 stored_size: 128,
 uncompressed_size: 256,
 crc32: 0x1234_5678,
 flags: FLAG_COMPRESSED | FLAG_CHECKSUM_VALID,
 };
 let bytes = header.encode();
 assert_eq!(bytes.len(), RECORD_HEADER_LEN);
 let decoded = RecordHeader::decode(&bytes).unwrap();
 assert_eq!(decoded, header);
 assert!(decoded.is_compressed());
 }

 #[test]
 fn rejects_unknown_tag_byte() {
 let mut header = RecordHeader {
 tag: ResourceTag::Sampler,
 hash: 0,
 stored_size: 0,
 uncompressed_size: 0,
 crc32: 0,
 flags: 0,
 }
.encode();
 header[0] = 250;
 let err = RecordHeader::decode(&header).unwrap_err();
 assert!(matches!(err, DbError::UnknownTag { tag: 250 }));
 }
}
