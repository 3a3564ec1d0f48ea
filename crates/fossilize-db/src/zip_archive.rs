// SPDX-License-Identifier: Apache-2.0
//! The ZIP container variant of the archive format : the same records, one per ZIP
//! entry, for tooling that would rather unpack a capture with a generic ZIP reader than link
//! against this crate.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use fossilize_model::{format_hash, Hash, ResourceTag};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::DbError;

/// Formats the ZIP entry name for a given `(tag, hash)`: `"<tag>/<hash>.foz"`.
#[must_use]
pub fn entry_name(tag: ResourceTag, hash: Hash) -> String {
 format!("{tag}/{}.foz", format_hash(hash))
}

/// Writes every `(tag, hash, payload)` triple as one uncompressed-by-default ZIP entry.
///
/// Unlike the single-file [`crate::Archive`], the ZIP variant is written once, in full, from a
/// complete in-memory snapshot — it has no append or merge story, matching how Fossilize's own
/// ZIP export only ever runs as an offline conversion step.
///
/// # Errors
///
/// Returns [`DbError::Io`] on filesystem failure or [`DbError::Zip`] if the ZIP writer fails.
pub fn write_zip(
 path: impl AsRef<Path>,
 entries: &[(ResourceTag, Hash, Vec<u8>)],
) -> Result<(), DbError> {
 let file = File::create(path)?;
 let mut writer = ZipWriter::new(file);
 let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
 for (tag, hash, payload) in entries {
 writer.start_file(entry_name(*tag, *hash), options)?;
 writer.write_all(payload)?;
 }
 writer.finish()?;
 Ok(())
}

/// Reads every entry out of a ZIP archive produced by [`write_zip`].
///
/// Entry names this function can't parse back into a `(tag, hash)` pair are skipped rather than
/// treated as an error, consistent with this crate's general tolerance of unrecognized content
/// at the edges of an archive.
///
/// # Errors
///
/// Returns [`DbError::Io`] on filesystem failure or [`DbError::Zip`] if the ZIP reader fails.
pub fn read_zip(path: impl AsRef<Path>) -> Result<Vec<(ResourceTag, Hash, Vec<u8>)>, DbError> {
 let file = File::open(path)?;
 let mut archive = ZipArchive::new(file)?;
 let mut out = Vec::with_capacity(archive.len());
 for i in 0..archive.len() {
 let mut entry = archive.by_index(i)?;
 let Some((tag, hash)) = parse_entry_name(entry.name()) else {
 continue;
 };
 let mut payload = Vec::new();
 entry.read_to_end(&mut payload)?;
 out.push((tag, hash, payload));
 }
 Ok(out)
}

fn parse_entry_name(name: &str) -> Option<(ResourceTag, Hash)> {
 let (tag_name, rest) = name.split_once('/')?;
 let hash_hex = rest.strip_suffix(".foz")?;
 let tag = ResourceTag::ALL.into_iter().find(|t| t.to_string() == tag_name)?;
 let hash = fossilize_model::parse_hash(hash_hex).ok()?;
 Some((tag, hash))
}

#[cfg(test)]
mod tests {
 use super::*;

 fn temp_path(name: &str) -> std::path::PathBuf {
 let mut path = std::env::temp_dir();
 path.push(format!("fossilize-db-zip-{name}-{}.zip", std::process::id()));
 path
 }

 #[test]
 fn entry_name_round_trips() {
 let name = entry_name(ResourceTag::GraphicsPipeline, 0xdead_beef);
 let (tag, hash) = parse_entry_name(&name).unwrap();
 assert_eq!(tag, ResourceTag::GraphicsPipeline);
 assert_eq!(hash, 0xdead_beef);
 }

 #[test]
 fn write_then_read_round_trips() {
 let path = temp_path("roundtrip");
 let entries = vec![
 (ResourceTag::Sampler, 1u64, b"sampler bytes".to_vec()),
 (ResourceTag::ShaderModule, 2u64, b"spirv bytes".to_vec()),
 ];
 write_zip(&path, &entries).unwrap();
 let mut read_back = read_zip(&path).unwrap();
 read_back.sort_by_key(|(_, hash, _)| *hash);
 assert_eq!(read_back, entries);
 std::fs::remove_file(&path).ok();
 }
}
