// SPDX-License-Identifier: Apache-2.0
//! Error type for archive I/O and integrity failures.

use std::io;

/// Everything that can go wrong opening, reading, or writing an archive.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Underlying filesystem I/O failed.
    #[error("archive I/O failed")]
    Io(#[from] io::Error),

    /// The file header's magic bytes don't match what this crate writes.
    #[error("not a Fossilize archive")]
    BadMagic,

    /// The file header's version doesn't match what this build understands.
    #[error("archive version {found} is not supported (expected {expected})")]
    VersionMismatch {
        /// Version found in the file header.
        found: u32,
        /// Version this build requires.
        expected: u32,
    },

    /// A record's CRC32 didn't match its stored payload.
    #[error("record checksum mismatch for hash {hash:016x}")]
    ChecksumMismatch {
        /// The hash of the corrupt record.
        hash: u64,
    },

    /// A record claimed a tag byte this build doesn't recognize.
    #[error("unknown resource tag byte {tag}")]
    UnknownTag {
        /// The raw tag byte read from the record header.
        tag: u8,
    },

    /// A write was attempted against an archive opened in [`crate::AccessMode::ReadOnly`].
    #[error("archive is read-only")]
    ReadOnly,

    /// Payload decompression failed.
    #[error("failed to inflate record payload")]
    Decompress,

    /// Payload compression failed.
    #[error("failed to deflate record payload")]
    Compress,

    /// The ZIP container variant reported an error.
    #[error("zip archive error")]
    Zip(#[from] zip::result::ZipError),
}
