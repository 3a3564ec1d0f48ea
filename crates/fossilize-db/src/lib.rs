// SPDX-License-Identifier: Apache-2.0
//! Content-addressed, append-only archive database (C4): the on-disk format encoded blobs are
//! stored in, how an archive is scanned on open, and how several per-process archives merge into
//! one.
//!
//! This crate never looks inside a payload — `fossilize-codec` owns encoding, `fossilize-hash`
//! owns fingerprinting, and everything here treats a record's payload as an opaque byte string
//! keyed by `(tag, hash)`.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]

mod archive;
mod compression;
mod concurrent;
mod error;
mod header;
mod record;
mod zip_archive;

pub use archive::{AccessMode, Archive};
pub use concurrent::{merge_into, per_process_archive_path};
pub use error::DbError;
pub use header::CURRENT_VERSION;
pub use record::{RecordHeader, FLAG_CHECKSUM_VALID, FLAG_COMPRESSED, RECORD_HEADER_LEN};
pub use zip_archive::{entry_name, read_zip, write_zip};
