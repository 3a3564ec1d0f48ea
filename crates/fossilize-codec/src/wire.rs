// SPDX-License-Identifier: Apache-2.0
//! Low-level scalar/array primitives shared by every per-object encoder and decoder.
//!
//! Fixed-width fields are little-endian; everything variable-length (arrays, strings, byte
//! blobs) is varint-length-prefixed — except SPIR-V word streams, which additionally varint-
//! encode each individual word (see [`crate::varint`]).

use crate::error::CodecError;
use crate::varint;

/// Append-only byte sink used while encoding one blob.
#[derive(Debug, Default)]
pub struct Writer {
    bytes: Vec<u8>,
}

impl Writer {
    /// A fresh, empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Consumes the writer, returning the accumulated bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Writes a single byte.
    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.bytes.push(value);
        self
    }

    /// Writes a `bool` as one byte.
    pub fn bool(&mut self, value: bool) -> &mut Self {
        self.u8(u8::from(value))
    }

    /// Writes a fixed-width little-endian `u32`.
    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Writes a fixed-width little-endian `i32`.
    pub fn i32(&mut self, value: i32) -> &mut Self {
        self.u32(value as u32)
    }

    /// Writes a fixed-width little-endian `u64`.
    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Writes an `f32` by its raw little-endian bit pattern.
    pub fn f32(&mut self, value: f32) -> &mut Self {
        self.u32(value.to_bits())
    }

    /// Appends raw bytes with no length prefix of their own — the caller owns framing.
    pub fn raw_bytes(&mut self, value: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(value);
        self
    }

    /// Writes a varint-length-prefixed byte string.
    pub fn bytes(&mut self, value: &[u8]) -> &mut Self {
        varint::encode(value.len() as u32, &mut self.bytes);
        self.bytes.extend_from_slice(value);
        self
    }

    /// Writes a varint-length-prefixed UTF-8 string.
    pub fn string(&mut self, value: &str) -> &mut Self {
        self.bytes(value.as_bytes())
    }

    /// Writes a varint array length; caller writes the `count` elements themselves.
    pub fn len_prefix(&mut self, count: usize) -> &mut Self {
        varint::encode(count as u32, &mut self.bytes);
        self
    }

    /// Writes a stream of SPIR-V words, each individually varint-encoded, length-prefixed by word
    /// count (not byte count).
    pub fn spirv_words(&mut self, words: &[u32]) -> &mut Self {
        self.len_prefix(words.len());
        for &word in words {
            varint::encode(word, &mut self.bytes);
        }
        self
    }

    /// Writes an optional `u64`: one presence byte, then the value if present.
    pub fn option_u64(&mut self, value: Option<u64>) -> &mut Self {
        match value {
            Some(v) => {
                self.bool(true);
                self.u64(v);
            }
            None => {
                self.bool(false);
            }
        }
        self
    }
}

/// Cursor over a byte slice being decoded.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Wraps `bytes` for reading from the start.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Bytes remaining after the current position.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// The decoder's position, for [`CodecError::TrailingGarbage`] checks by the caller.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < count {
            return Err(CodecError::UnexpectedEof {
                wanted: count,
                available: self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    /// Reads a single byte.
    pub fn u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    /// Reads a `bool` from one byte (any nonzero value is `true`).
    pub fn bool(&mut self) -> Result<bool, CodecError> {
        Ok(self.u8()? != 0)
    }

    /// Reads a fixed-width little-endian `u32`.
    pub fn u32(&mut self) -> Result<u32, CodecError> {
        let slice = self.take(4)?;
        Ok(u32::from_le_bytes(slice.try_into().unwrap_or([0; 4])))
    }

    /// Reads a fixed-width little-endian `i32`.
    pub fn i32(&mut self) -> Result<i32, CodecError> {
        Ok(self.u32()? as i32)
    }

    /// Reads a fixed-width little-endian `u64`.
    pub fn u64(&mut self) -> Result<u64, CodecError> {
        let slice = self.take(8)?;
        Ok(u64::from_le_bytes(slice.try_into().unwrap_or([0; 8])))
    }

    /// Reads an `f32` from its raw little-endian bit pattern.
    pub fn f32(&mut self) -> Result<f32, CodecError> {
        Ok(f32::from_bits(self.u32()?))
    }

    /// Reads a varint array/collection length.
    pub fn len_prefix(&mut self) -> Result<usize, CodecError> {
        let (value, consumed) = varint::decode(&self.bytes[self.pos..])?;
        self.pos += consumed;
        Ok(value as usize)
    }

    /// Reads a varint-length-prefixed byte string.
    pub fn bytes(&mut self) -> Result<&'a [u8], CodecError> {
        let len = self.len_prefix()?;
        self.take(len)
    }

    /// Reads exactly `len` bytes, without any length prefix of its own.
    pub fn bytes_exact(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        self.take(len)
    }

    /// Reads a varint-length-prefixed UTF-8 string.
    pub fn string(&mut self) -> Result<String, CodecError> {
        let bytes = self.bytes()?;
        std::str::from_utf8(bytes)
            .map(ToOwned::to_owned)
            .map_err(|_| CodecError::InvalidUtf8)
    }

    /// Reads a SPIR-V word stream: a varint word count, then that many individually
    /// varint-encoded words.
    pub fn spirv_words(&mut self) -> Result<Vec<u32>, CodecError> {
        let count = self.len_prefix()?;
        let mut words = Vec::with_capacity(count.min(1 << 16));
        for _ in 0..count {
            let (word, consumed) = varint::decode(&self.bytes[self.pos..])?;
            self.pos += consumed;
            words.push(word);
        }
        Ok(words)
    }

    /// Reads an optional `u64` written by [`Writer::option_u64`].
    pub fn option_u64(&mut self) -> Result<Option<u64>, CodecError> {
        if self.bool()? {
            Ok(Some(self.u64()?))
        } else {
            Ok(None)
        }
    }
}
