// SPDX-License-Identifier: Apache-2.0
//! A growing chain of fixed-size blocks holding every [`InternedObject`] a [`crate::Recorder`]
//! has produced.
//!
//! Unlike the original's byte arena (which deep-copies pointer-rich create-infos into raw
//! storage it owns), normalized create-infos here are already plain owned Rust values — there is
//! no pointer identity left to preserve. What the arena still buys us is the original's
//! lifecycle guarantee: every object a `Recorder` has ever interned is freed in one shot when the
//! `Recorder` (and therefore its `Arena`) is dropped, and nothing outside this module ever frees
//! one object independently of the rest.

use fossilize_model::InternedObject;

const BLOCK_CAPACITY: usize = 256;

/// A stable index into an [`Arena`]. Valid only for the arena that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaIndex(usize);

/// Append-only, page-blocked storage for interned objects.
///
/// Pushing never invalidates a previously returned [`ArenaIndex`] — blocks are allocated in
/// fixed-size chunks and never moved, only appended to.
#[derive(Debug, Default)]
pub struct Arena {
 blocks: Vec<Vec<InternedObject>>,
 len: usize,
}

impl Arena {
 /// An empty arena with no blocks allocated yet.
 #[must_use]
 pub fn new() -> Self {
 Self {
 blocks: Vec::new(),
 len: 0,
 }
 }

 /// Number of objects currently interned.
 #[must_use]
 pub const fn len(&self) -> usize {
 self.len
 }

 /// `true` if no object has been interned yet.
 #[must_use]
 pub const fn is_empty(&self) -> bool {
 self.len == 0
 }

 /// Appends `object`, allocating a new block if the current one is full.
 pub fn push(&mut self, object: InternedObject) -> ArenaIndex {
 if self.len % BLOCK_CAPACITY == 0 {
 self.blocks.push(Vec::with_capacity(BLOCK_CAPACITY));
 }
 let block = self
.blocks
.last_mut()
.expect("just pushed a block if needed");
 block.push(object);
 let index = self.len;
 self.len += 1;
 ArenaIndex(index)
 }

 /// Looks up a previously pushed object by its index.
 #[must_use]
 pub fn get(&self, index: ArenaIndex) -> Option<&InternedObject> {
 let ArenaIndex(flat) = index;
 self.blocks
.get(flat / BLOCK_CAPACITY)
.and_then(|block| block.get(flat % BLOCK_CAPACITY))
 }

 /// Iterates every interned object in push order.
 pub fn iter(&self) -> impl Iterator<Item = &InternedObject> {
 self.blocks.iter().flatten()
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use fossilize_model::{NormalizedObject, SamplerInfo};

 fn dummy(hash: u64) -> InternedObject {
 InternedObject::new(hash, NormalizedObject::Sampler(SamplerInfo::new()))
 }

 #[test]
 fn indices_stay_valid_across_a_block_boundary() {
 let mut arena = Arena::new();
 let mut indices = Vec::new();
 for i in 0..(BLOCK_CAPACITY * 2 + 3) {
 indices.push(arena.push(dummy(i as u64)));
 }
 for (i, index) in indices.into_iter().enumerate() {
 assert_eq!(arena.get(index).unwrap().hash, i as u64);
 }
 }

 #[test]
 fn iter_visits_every_object_in_push_order() {
 let mut arena = Arena::new();
 for i in 0..10 {
 arena.push(dummy(i));
 }
 let hashes: Vec<u64> = arena.iter().map(|o| o.hash).collect();
 assert_eq!(hashes, (0..10).collect::<Vec<_>>());
 }
}
