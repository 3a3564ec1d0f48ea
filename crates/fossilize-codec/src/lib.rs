// SPDX-License-Identifier: Apache-2.0
//! Self-describing binary encoding for Fossilize's normalized create-info objects.
//!
//! This crate owns exactly one concern: turning a [`fossilize_model::NormalizedObject`] into
//! bytes and back, byte-identically across runs and machines — that determinism is
//! what makes `fossilize-hash`'s fingerprints portable in the first place. It knows nothing about
//! archives, recording, or replay; `fossilize-db` is the only other crate that touches these bytes.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]

mod blob;
mod error;
mod object;
mod pnext;
mod varint;
mod wire;

pub use blob::{decode_blob, encode_blob, FORMAT_VERSION};
pub use error::CodecError;
pub use wire::{Reader, Writer};

/// Direct access to the per-object encoders, for callers (e.g. `fossilize-db`'s merge tooling)
/// that already know an object's tag and want to skip the blob-header framing.
pub use object::{decode as decode_object, encode as encode_object};

/// Direct access to the SPIR-V word varint, for tooling that wants to inspect encoded size
/// without going through a full blob.
pub mod spirv_varint {
 pub use crate::varint::{decode, encode};
}
