// SPDX-License-Identifier: Apache-2.0
//! Synchronous, inline recording: encode one object and write it to an archive on the calling
//! thread, with no queue and no backpressure to reason about.

use fossilize_codec::encode_blob;
use fossilize_db::Archive;
use fossilize_model::InternedObject;

use crate::error::WorkerError;

/// Encodes `object` and writes it to `archive`, compressing the payload when `compress` is set.
///
/// A no-op if `archive` already holds an entry for this object's `(tag, hash)` — the same
/// idempotence [`fossilize_db::Archive::write_entry`] guarantees.
///
/// # Errors
///
/// Returns [`WorkerError::Db`] if the underlying archive write fails.
pub fn record_sync(
 archive: &mut Archive,
 object: &InternedObject,
 compress: bool,
) -> Result<(), WorkerError> {
 let bytes = encode_blob(&object.object);
 archive.write_entry(object.tag(), object.hash, &bytes, compress)?;
 Ok(())
}

#[cfg(test)]
mod tests {
 use super::*;
 use fossilize_db::AccessMode;
 use fossilize_model::{NormalizedObject, SamplerInfo};

 fn temp_path(name: &str) -> std::path::PathBuf {
 let mut path = std::env::temp_dir();
 path.push(format!(
 "fossilize-worker-sync-{name}-{}.foz",
 std::process::id()
 ));
 path
 }

 #[test]
 fn records_an_object_synchronously() {
 let path = temp_path("basic");
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();
 let object = InternedObject::new(1, NormalizedObject::Sampler(SamplerInfo::new()));

 record_sync(&mut archive, &object, false).unwrap();
 assert!(archive.has_entry(object.tag(), object.hash));

 std::fs::remove_file(&path).ok();
 }

 #[test]
 fn recording_twice_is_idempotent() {
 let path = temp_path("idempotent");
 let mut archive = Archive::open(&path, AccessMode::Append).unwrap();
 let object = InternedObject::new(2, NormalizedObject::Sampler(SamplerInfo::new()));

 record_sync(&mut archive, &object, false).unwrap();
 record_sync(&mut archive, &object, false).unwrap();
 assert_eq!(archive.len(), 1);

 std::fs::remove_file(&path).ok();
 }
}
