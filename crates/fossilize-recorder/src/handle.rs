// SPDX-License-Identifier: Apache-2.0
//! The live, process-local object handle a capture layer hands the recorder — opaque outside
//! this crate, never written to disk.

/// A live API object handle, scoped to one [`crate::Recorder`] instance.
///
/// This stands in for whatever pointer-sized integer the graphics API hands back from a
/// `vkCreate*` call. Fossilize never dereferences it — it is purely a lookup key into the
/// recorder's handle→hash map until the object it names has been interned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub u64);

impl Handle {
 /// Wraps a raw API handle value.
 #[must_use]
 pub const fn new(value: u64) -> Self {
 Self(value)
 }
}

impl From<u64> for Handle {
 fn from(value: u64) -> Self {
 Self(value)
 }
}
