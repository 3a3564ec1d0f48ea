// SPDX-License-Identifier: Apache-2.0
//! Deflate wrapper for record payloads.

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::DbError;

/// Deflates `data` at the given compression level.
///
/// # Errors
///
/// Returns [`DbError::Compress`] if the encoder fails.
pub fn deflate(data: &[u8], level: Compression) -> Result<Vec<u8>, DbError> {
 let mut encoder = DeflateEncoder::new(Vec::new(), level);
 encoder.write_all(data).map_err(|_| DbError::Compress)?;
 encoder.finish().map_err(|_| DbError::Compress)
}

/// Inflates a deflate-compressed buffer, expecting exactly `expected_len` output bytes.
///
/// # Errors
///
/// Returns [`DbError::Decompress`] if the stream is malformed or yields a different length
/// than expected.
pub fn inflate(data: &[u8], expected_len: u32) -> Result<Vec<u8>, DbError> {
 let mut decoder = DeflateDecoder::new(data);
 let mut out = Vec::with_capacity(expected_len as usize);
 decoder
.read_to_end(&mut out)
.map_err(|_| DbError::Decompress)?;
 if out.len() as u32 != expected_len {
 return Err(DbError::Decompress);
 }
 Ok(out)
}
