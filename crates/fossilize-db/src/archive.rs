// SPDX-License-Identifier: Apache-2.0
//! The single-file, content-addressed archive.
//!
//! An [`Archive`] is a flat sequence of `[header][record]*` bytes. Every record is
//! self-describing, so opening an archive is just scanning it end to end once; a record this
//! crate can't fully decode — an unknown tag, a truncated length, a checksum that doesn't match —
//! ends the scan right there rather than failing the open. Everything scanned before that point
//! stays valid and reachable : a process that crashes mid-write
//! never corrupts what a prior run already committed.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fossilize_model::{Hash, ResourceTag};
use flate2::Compression;
use tracing::{debug, warn};

use crate::compression::{deflate, inflate};
use crate::error::DbError;
use crate::header;
use crate::record::{RecordHeader, FLAG_CHECKSUM_VALID, FLAG_COMPRESSED, RECORD_HEADER_LEN};

/// How an [`Archive`] was opened, and what it permits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessMode {
 /// Open for reading and writing; new entries are appended after the last valid record.
 /// Any trailing bytes that don't form a complete, checksum-valid record are discarded
 /// (truncated away) the moment the archive is opened.
 Append,
 /// Open for reading only. The file is never modified, even if it has trailing garbage.
 ReadOnly,
 /// Discard any existing contents and start a fresh archive with just the file header.
 Overwrite,
}

/// Where one record's payload lives within [`Archive`]'s in-memory buffer, and the header that
/// describes it.
#[derive(Clone, Copy, Debug)]
struct RecordLocation {
 offset: usize,
 header: RecordHeader,
}

/// A single content-addressed archive file.
///
/// Reads are served from an in-memory copy of the whole file loaded at [`Archive::open`] time;
/// this crate has no dependency that would let it safely memory-map the file, so it trades a
/// larger resident footprint for a simple, portable implementation.
pub struct Archive {
 mode: AccessMode,
 file: Option<File>,
 buffer: Vec<u8>,
 index: HashMap<(ResourceTag, Hash), RecordLocation>,
 order: HashMap<ResourceTag, Vec<Hash>>,
}

impl Archive {
 /// Opens or creates an archive at `path` under the given [`AccessMode`].
 ///
 /// # Errors
 ///
 /// Returns [`DbError::Io`] on filesystem failure, or [`DbError::BadMagic`] /
 /// [`DbError::VersionMismatch`] if an existing file isn't a Fossilize archive this build
 /// understands.
 pub fn open(path: impl AsRef<Path>, mode: AccessMode) -> Result<Self, DbError> {
 let path = path.as_ref();
 match mode {
 AccessMode::Overwrite => Self::create_fresh(path),
 AccessMode::ReadOnly => Self::open_read_only(path),
 AccessMode::Append => Self::open_append(path),
 }
 }

 fn create_fresh(path: &Path) -> Result<Self, DbError> {
 let mut file = OpenOptions::new()
.create(true)
.truncate(true)
.read(true)
.write(true)
.open(path)?;
 let header_bytes = header::encode();
 file.write_all(&header_bytes)?;
 file.flush()?;
 Ok(Self {
 mode: AccessMode::Overwrite,
 file: Some(file),
 buffer: header_bytes.to_vec(),
 index: HashMap::new(),
 order: HashMap::new(),
 })
 }

 fn open_read_only(path: &Path) -> Result<Self, DbError> {
 let mut file = File::open(path)?;
 let mut buffer = Vec::new();
 file.read_to_end(&mut buffer)?;
 header::validate(&buffer)?;
 let (index, order, _valid_end) = scan(&buffer);
 Ok(Self {
 mode: AccessMode::ReadOnly,
 file: None,
 buffer,
 index,
 order,
 })
 }

 fn open_append(path: &Path) -> Result<Self, DbError> {
 let mut file = OpenOptions::new()
.create(true)
.read(true)
.write(true)
.open(path)?;
 let mut buffer = Vec::new();
 file.read_to_end(&mut buffer)?;

 if buffer.is_empty() {
 let header_bytes = header::encode();
 file.write_all(&header_bytes)?;
 file.flush()?;
 return Ok(Self {
 mode: AccessMode::Append,
 file: Some(file),
 buffer: header_bytes.to_vec(),
 index: HashMap::new(),
 order: HashMap::new(),
 });
 }

 header::validate(&buffer)?;
 let (index, order, valid_end) = scan(&buffer);
 if valid_end < buffer.len() {
 warn!(
 dropped_bytes = buffer.len() - valid_end,
 path = %path.display(),
 "discarding trailing unscannable bytes from archive"
 );
 buffer.truncate(valid_end);
 file.set_len(valid_end as u64)?;
 }
 file.seek(SeekFrom::End(0))?;
 Ok(Self {
 mode: AccessMode::Append,
 file: Some(file),
 buffer,
 index,
 order,
 })
 }

 /// `true` if an entry for `(tag, hash)` is already present.
 #[must_use]
 pub fn has_entry(&self, tag: ResourceTag, hash: Hash) -> bool {
 self.index.contains_key(&(tag, hash))
 }

 /// Writes a new entry, compressing the payload first when `compress` is set.
 ///
 /// A no-op if an entry for `(tag, hash)` already exists : the archive
 /// is content-addressed, so a second write of the same content can never disagree with the
 /// first.
 ///
 /// # Errors
 ///
 /// Returns [`DbError::ReadOnly`] if this archive was opened with [`AccessMode::ReadOnly`],
 /// [`DbError::Compress`] if compression fails, or [`DbError::Io`] on write failure.
 pub fn write_entry(
 &mut self,
 tag: ResourceTag,
 hash: Hash,
 payload: &[u8],
 compress: bool,
 ) -> Result<(), DbError> {
 if self.mode == AccessMode::ReadOnly {
 return Err(DbError::ReadOnly);
 }
 if self.has_entry(tag, hash) {
 debug!(%tag, hash = fossilize_model::format_hash(hash), "skipping duplicate write");
 return Ok(());
 }

 let (stored, flags) = if compress {
 (deflate(payload, Compression::default())?, FLAG_COMPRESSED)
 } else {
 (payload.to_vec(), 0)
 };
 let crc32 = crc32fast::hash(&stored);
 let header = RecordHeader {
 tag,
 hash,
 stored_size: u32::try_from(stored.len()).unwrap_or(u32::MAX),
 uncompressed_size: u32::try_from(payload.len()).unwrap_or(u32::MAX),
 crc32,
 flags: flags | FLAG_CHECKSUM_VALID,
 };

 let file = self.file.as_mut().ok_or(DbError::ReadOnly)?;
 file.write_all(&header.encode())?;
 file.write_all(&stored)?;
 file.flush()?;

 self.buffer.extend_from_slice(&header.encode());
 let offset = self.buffer.len();
 self.buffer.extend_from_slice(&stored);

 self.index.insert((tag, hash), RecordLocation { offset, header });
 self.order.entry(tag).or_default().push(hash);
 Ok(())
 }

 /// Reads and decompresses an entry's payload, verifying its checksum first.
 ///
 /// Returns `Ok(None)` if no entry exists for `(tag, hash)`.
 ///
 /// # Errors
 ///
 /// Returns [`DbError::ChecksumMismatch`] if the stored bytes don't match their recorded
 /// CRC32, or [`DbError::Decompress`] if a compressed payload fails to inflate.
 pub fn read_entry(&self, tag: ResourceTag, hash: Hash) -> Result<Option<Vec<u8>>, DbError> {
 let Some(location) = self.index.get(&(tag, hash)) else {
 return Ok(None);
 };
 let stored = &self.buffer[location.offset..location.offset + location.header.stored_size as usize];
 let crc32 = crc32fast::hash(stored);
 if crc32 != location.header.crc32 {
 return Err(DbError::ChecksumMismatch { hash });
 }
 let payload = if location.header.is_compressed() {
 inflate(stored, location.header.uncompressed_size)?
 } else {
 stored.to_vec()
 };
 Ok(Some(payload))
 }

 /// All hashes recorded under `tag`, in the order they were written.
 #[must_use]
 pub fn get_hash_list_for_resource_tag(&self, tag: ResourceTag) -> &[Hash] {
 self.order.get(&tag).map_or(&[], Vec::as_slice)
 }

 /// How this archive was opened.
 #[must_use]
 pub const fn mode(&self) -> AccessMode {
 self.mode
 }

 /// Total number of entries currently indexed.
 #[must_use]
 pub fn len(&self) -> usize {
 self.index.len()
 }

 /// `true` if the archive holds no entries.
 #[must_use]
 pub fn is_empty(&self) -> bool {
 self.index.is_empty()
 }

 /// Every `(tag, hash)` key currently indexed, for merge and inspection tooling.
 pub fn keys(&self) -> impl Iterator<Item = (ResourceTag, Hash)> + '_ {
 self.index.keys().copied()
 }
}

/// Scans the body of an archive (everything after the 16-byte file header) for valid records.
///
/// Stops at the first byte offset that doesn't begin a complete, checksum-valid record — an
/// unknown tag, a length that runs past the end of `buffer`, or a checksum mismatch all end the
/// scan without treating it as an error. Returns the index built so far, the per-tag hash order,
/// and the absolute offset (from the start of `buffer`, header included) up to which the file is
/// valid.
fn scan(
 buffer: &[u8],
) -> (
 HashMap<(ResourceTag, Hash), RecordLocation>,
 HashMap<ResourceTag, Vec<Hash>>,
 usize,
) {
 let mut index = HashMap::new();
 let mut order: HashMap<ResourceTag, Vec<Hash>> = HashMap::new();
 let mut pos = header::HEADER_LEN;

 loop {
 if buffer.len() - pos < RECORD_HEADER_LEN {
 break;
 }
 let mut header_bytes = [0u8; RECORD_HEADER_LEN];
 header_bytes.copy_from_slice(&buffer[pos..pos + RECORD_HEADER_LEN]);
 let Ok(record_header) = RecordHeader::decode(&header_bytes) else {
 break;
 };
 let payload_start = pos + RECORD_HEADER_LEN;
 let stored_size = record_header.stored_size as usize;
 if buffer.len() - payload_start < stored_size {
 break;
 }
 let stored = &buffer[payload_start..payload_start + stored_size];
 if crc32fast::hash(stored) != record_header.crc32 {
 break;
 }

 let key = (record_header.tag, record_header.hash);
 index.insert(
 key,
 RecordLocation {
 offset: payload_start,
 header: record_header,
 },
 );
 order.entry(record_header.tag).or_default().push(record_header.hash);

 pos = payload_start + stored_size;
 }

 (index, order, pos)
}

#[cfg(test)]
mod tests {
 use super::*;

 fn temp_path(name: &str) -> PathBuf {
 let mut path = std::env::temp_dir();
 path.push(format!(
 "fossilize-db-test-{name}-{}-{}.foz",
 std::process::id(),
 order_test_nonce()
 ));
 path
 }

 fn order_test_nonce() -> u64 {
 use std::sync::atomic::{AtomicU64, Ordering};
 static NEXT: AtomicU64 = AtomicU64::new(0);
 NEXT.fetch_add(1, Ordering::Relaxed)
 }

 #[test]
 fn fresh_archive_has_no_entries() {
 let path = temp_path("fresh");
 let archive = Archive::open(&path, AccessMode::Overwrite).unwrap();
 assert!(archive.is_empty());
 std::fs::remove_file(&path).ok();
 }

 #[test]
 fn write_then_read_round_trips() {
 let path = temp_path("roundtrip");
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();
 archive
.write_entry(ResourceTag::ShaderModule, 42, b"spirv bytes here", true)
.unwrap();
 let got = archive
.read_entry(ResourceTag::ShaderModule, 42)
.unwrap()
.unwrap();
 assert_eq!(got, b"spirv bytes here");
 std::fs::remove_file(&path).ok();
 }

 #[test]
 fn duplicate_write_is_idempotent() {
 let path = temp_path("dup");
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();
 archive
.write_entry(ResourceTag::Sampler, 1, b"first", false)
.unwrap();
 archive
.write_entry(ResourceTag::Sampler, 1, b"first", false)
.unwrap();
 assert_eq!(archive.len(), 1);
 std::fs::remove_file(&path).ok();
 }

 #[test]
 fn read_only_rejects_writes() {
 let path = temp_path("readonly");
 {
 let mut archive = Archive::open(&path, AccessMode::Overwrite).unwrap();
 archive
.write_entry(ResourceTag::Sampler, 7, b"payload", false)
.unwrap();
 }
 let mut archive = Archive::open(&path, AccessMode::ReadOnly).unwrap();
 assert!(archive.has_entry(ResourceTag::Sampler, 7));
 let err = archive
.write_entry(ResourceTag::Sampler, 8, b"nope", false)
.unwrap_err();
 assert!(matches!(err, DbError::ReadOnly));
 std::fs::remove_file(&path).ok();
 }

 #[test]
 fn reopen_after_close_preserves_entries() {
 let path = temp_path("reopen");
 {
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();
 archive
.write_entry(ResourceTag::RenderPass, 99, b"render pass bytes", false)
.unwrap();
 }
 let archive = Archive::open(&path, AccessMode::Append).unwrap();
 assert!(archive.has_entry(ResourceTag::RenderPass, 99));
 assert_eq!(archive.len(), 1);
 std::fs::remove_file(&path).ok();
 }

 #[test]
 fn truncated_trailing_garbage_is_discarded_on_open() {
 let path = temp_path("truncated");
 {
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();
 archive
.write_entry(ResourceTag::Sampler, 1, b"good entry", false)
.unwrap();
 }
 {
 let mut file = OpenOptions::new().append(true).open(&path).unwrap();
 file.write_all(&[1, 2, 3, 4, 5]).unwrap();
 }
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();
 assert!(archive.has_entry(ResourceTag::Sampler, 1));
 assert_eq!(archive.len(), 1);
 archive
.write_entry(ResourceTag::Sampler, 2, b"second entry", false)
.unwrap();
 drop(archive);

 let reopened = Archive::open(&path, AccessMode::ReadOnly).unwrap();
 assert_eq!(reopened.len(), 2);
 std::fs::remove_file(&path).ok();
 }

 #[test]
 fn hash_list_preserves_write_order() {
 let path = temp_path("order");
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();
 archive
.write_entry(ResourceTag::Sampler, 3, b"c", false)
.unwrap();
 archive
.write_entry(ResourceTag::Sampler, 1, b"a", false)
.unwrap();
 archive
.write_entry(ResourceTag::Sampler, 2, b"b", false)
.unwrap();
 assert_eq!(
 archive.get_hash_list_for_resource_tag(ResourceTag::Sampler),
 &[3, 1, 2]
 );
 std::fs::remove_file(&path).ok();
 }
}
