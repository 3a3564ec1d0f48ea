// SPDX-License-Identifier: Apache-2.0
//! The [`SharedControlBlock`]: the one piece of state shared across process boundaries. Everything else in an orchestration is per-process.
//!
//! The block is a fixed, C-ABI-compatible layout of plain `Atomic*` counters plus a
//! power-of-two-sized ring of 64-byte text-message slots, mapped read/write by every worker and
//! by the master. Counters use `Relaxed` ordering — the reader treats them as advisory, per
//! spec.md §5 — except `progress_started`/`progress_complete`, which use `Release`/`Acquire` so a
//! reader that observes completion also observes every counter update that preceded it.
//!
//! This module reaches raw pointers into the shared region directly rather than going through a
//! safe mmap-typed-struct crate, matching the design note in spec.md §9 ("Use a shared-memory
//! region with a fixed C-ABI-compatible layout, plain 32-bit atomics, and a user-space lock");
//! it is the one module in this crate allowed to use `unsafe`.
#![allow(unsafe_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use crate::ring_lock::RingLock;

/// Magic value stamped into a freshly-initialized block's `version_cookie` field.
pub const VERSION_COOKIE: u32 = 0x19bc_de1d;

/// Number of per-process slots in the heartbeat/memory-usage arrays.
pub const MAX_PROCESSES: usize = 256;

/// Default ring capacity in 64-byte message slots. Must stay a power of two.
pub const DEFAULT_RING_CAPACITY: usize = 64;

/// Fixed width of one ring message slot, in bytes.
pub const RING_SLOT_LEN: usize = 64;

/// One pipeline kind's counters.
#[repr(C)]
#[derive(Debug, Default)]
pub struct PipelineKindCounters {
 /// Pipelines successfully built.
 pub successes: AtomicU32,
 /// Pipelines the creator reported as skipped.
 pub skips: AtomicU32,
 /// Pipelines served from a cache rather than freshly compiled.
 pub caches: AtomicU32,
 /// Archive entries that failed to parse.
 pub parses: AtomicU32,
 /// Pipelines that failed outright (distinct from a validation rejection).
 pub failures: AtomicU32,
 /// Total pipelines of this kind known to exist, fixed once the archive is scanned.
 pub total: AtomicU32,
}

/// Module-level counters.
#[repr(C)]
#[derive(Debug, Default)]
pub struct ModuleCounters {
 /// Total shader modules in the archive.
 pub total: AtomicU32,
 /// Modules successfully created.
 pub completed: AtomicU32,
 /// Modules masked because they previously crashed the driver.
 pub banned: AtomicU32,
 /// Modules the validation layer rejected.
 pub validation_failed: AtomicU32,
}

/// Per-process resource usage and liveness, one slot per worker.
#[repr(C)]
#[derive(Debug, Default)]
pub struct ProcessSlot {
 /// Reserved (virtual) memory, in MiB, as last reported by this process.
 pub reserved_mib: AtomicU32,
 /// Shared (resident, cross-process) memory, in MiB, as last reported by this process.
 pub shared_mib: AtomicU32,
 /// Unix timestamp of this process's last heartbeat.
 pub heartbeat_unix_secs: AtomicU32,
}

/// The fixed-layout header occupying the start of the shared-memory region.
///
/// The message ring's bytes immediately follow this header in the same mapping; `ring_offset`
/// records where, so the layout is self-describing to a reader that only has the base pointer.
#[repr(C)]
pub struct ControlBlockHeader {
 /// Stamped to [`VERSION_COOKIE`] once initialized; a mismatch means the region is garbage or
 /// belongs to an incompatible build.
 pub version_cookie: AtomicU32,
 /// `1` once the first worker has reported progress, `0` before. Release/Acquire.
 pub progress_started: AtomicU32,
 /// `1` once every worker has reached a terminal state. Release/Acquire.
 pub progress_complete: AtomicU32,
 /// Graphics/compute/raytracing pipeline counters, in that order.
 pub pipelines: [PipelineKindCounters; 3],
 /// Shader module counters.
 pub modules: ModuleCounters,
 /// Clean (`exit 0`) process terminations observed so far.
 pub clean_process_deaths: AtomicU32,
 /// Dirty (crashed, timed out, or killed) process terminations observed so far.
 pub dirty_process_deaths: AtomicU32,
 /// Per-worker heartbeat and memory usage.
 pub processes: [ProcessSlot; MAX_PROCESSES],
 /// Ring write cursor.
 pub ring_write_count: AtomicU32,
 /// Ring read cursor (free-running).
 pub ring_read_count: AtomicU32,
 /// Number of 64-byte slots in the ring. Fixed at creation; must be a power of two.
 pub ring_capacity: u32,
 /// Byte offset of the ring's first slot, relative to the start of this header.
 pub ring_offset: u32,
}

/// Index into [`ControlBlockHeader::pipelines`] for one pipeline kind.
#[must_use]
pub const fn pipeline_kind_index(kind: crate::message::PipelineKind) -> usize {
 match kind {
 crate::message::PipelineKind::Graphics => 0,
 crate::message::PipelineKind::Compute => 1,
 crate::message::PipelineKind::Raytrace => 2,
 }
}

impl ControlBlockHeader {
 /// Size in bytes of the fixed header, excluding the ring's own slot bytes.
 #[must_use]
 pub const fn header_len() -> usize {
 std::mem::size_of::<Self>()
 }

 /// Total size in bytes of a region sized for `ring_capacity` slots: the header plus
 /// `ring_capacity * RING_SLOT_LEN` bytes.
 #[must_use]
 pub const fn total_len(ring_capacity: usize) -> usize {
 Self::header_len() + ring_capacity * RING_SLOT_LEN
 }

 /// Number of messages currently available to read: `write_count - read_count`, wrapping,
 /// per spec.md invariant 4.
 #[must_use]
 pub fn available(&self) -> u32 {
 self.ring_write_count
.load(Ordering::Relaxed)
.wrapping_sub(self.ring_read_count.load(Ordering::Relaxed))
 }

 /// Free slot count: `ring_size - available`.
 #[must_use]
 pub fn free(&self) -> u32 {
 self.ring_capacity.saturating_sub(self.available())
 }

 /// Marks that at least one worker has begun reporting progress.
 pub fn mark_progress_started(&self) {
 self.progress_started.store(1, Ordering::Release);
 }

 /// `true` once [`ControlBlockHeader::mark_progress_started`] has been called.
 #[must_use]
 pub fn progress_has_started(&self) -> bool {
 self.progress_started.load(Ordering::Acquire) != 0
 }

 /// Marks that every worker has reached a terminal state.
 pub fn mark_progress_complete(&self) {
 self.progress_complete.store(1, Ordering::Release);
 }

 /// `true` once [`ControlBlockHeader::mark_progress_complete`] has been called.
 #[must_use]
 pub fn progress_is_complete(&self) -> bool {
 self.progress_complete.load(Ordering::Acquire) != 0
 }
}

/// A mapped [`ControlBlockHeader`] plus the backing memory it lives in, and the lock that
/// protects the ring buffer's slot bytes and cursors together.
pub struct SharedControlBlock<M> {
 mapping: M,
 header: *const ControlBlockHeader,
 lock: Box<dyn RingLock>,
}

// SAFETY: every field reachable through `header` is either a plain `Atomic*` (safe to share) or
// a fixed-size array of them; the only non-atomic fields (`ring_capacity`, `ring_offset`) are
// written once before the pointer is shared and never mutated again.
unsafe impl<M: Send> Send for SharedControlBlock<M> {}
// SAFETY: all mutation goes through atomics or through `self.lock`, which serializes access to
// the ring's slot bytes across threads and processes.
unsafe impl<M: Sync> Sync for SharedControlBlock<M> {}

impl<M: AsMut<[u8]> + AsRef<[u8]>> SharedControlBlock<M> {
 /// Initializes a freshly-allocated region as a new control block, stamping the header and
 /// zeroing every counter. `ring_capacity` must be a power of two.
 ///
 /// # Panics
 ///
 /// Panics if `ring_capacity` is not a power of two, or `mapping` is smaller than
 /// [`ControlBlockHeader::total_len`] for that capacity — both are programmer errors in the
 /// caller that sized the allocation.
 pub fn initialize(mut mapping: M, ring_capacity: u32, lock: Box<dyn RingLock>) -> Self {
 assert!(ring_capacity.is_power_of_two(), "ring capacity must be a power of two");
 let required = ControlBlockHeader::total_len(ring_capacity as usize);
 assert!(mapping.as_mut().len() >= required, "shared region too small for ring capacity");

 let ptr = mapping.as_mut().as_mut_ptr().cast::<ControlBlockHeader>();
 // SAFETY: `mapping` is sized for at least `total_len(ring_capacity)` bytes, aligned by
 // the allocator (page-aligned mmap regions always exceed `ControlBlockHeader`'s
 // alignment), and the header is zero-valid for every field (`AtomicU32` is
 // zero-initializable, and the two plain `u32`s are written immediately below).
 unsafe {
 std::ptr::write_bytes(ptr.cast::<u8>(), 0, ControlBlockHeader::header_len());
 let header = &*ptr;
 header.version_cookie.store(VERSION_COOKIE, Ordering::Release);
 std::ptr::addr_of!(header.ring_capacity).cast_mut().write(ring_capacity);
 std::ptr::addr_of!(header.ring_offset)
.cast_mut()
.write(u32::try_from(ControlBlockHeader::header_len()).unwrap_or(u32::MAX));
 }

 Self {
 header: ptr.cast_const(),
 mapping,
 lock,
 }
 }

 /// Maps an already-initialized region, verifying its [`VERSION_COOKIE`].
 ///
 /// # Errors
 ///
 /// Returns [`crate::error::OrchestratorError::ControlBlockNotInitialized`] if the region's
 /// cookie doesn't match — either it was never initialized, or it belongs to an incompatible
 /// build.
 pub fn open(mut mapping: M, lock: Box<dyn RingLock>) -> Result<Self, crate::error::OrchestratorError> {
 let ptr = mapping.as_mut().as_mut_ptr().cast::<ControlBlockHeader>();
 // SAFETY: caller guarantees `mapping` was produced by `initialize` on a region of at
 // least `ControlBlockHeader::header_len()` bytes.
 let cookie = unsafe { (*ptr).version_cookie.load(Ordering::Acquire) };
 if cookie != VERSION_COOKIE {
 return Err(crate::error::OrchestratorError::ControlBlockNotInitialized);
 }
 Ok(Self {
 header: ptr.cast_const(),
 mapping,
 lock,
 })
 }

 /// The typed header view.
 #[must_use]
 pub fn header(&self) -> &ControlBlockHeader {
 // SAFETY: `self.header` was derived from `self.mapping` in `initialize`/`open` and the
 // mapping outlives every reference handed out, since both live in `self`.
 unsafe { &*self.header }
 }

 /// Appends one message to the ring, dropping it and returning `false` if the ring is full
 ///.
 pub fn push_message(&self, text: &str) -> bool {
 let _guard = self.lock.lock();
 let header = self.header();
 if header.free() == 0 {
 return false;
 }
 let capacity = header.ring_capacity;
 let write_count = header.ring_write_count.load(Ordering::Relaxed);
 let slot_index = (write_count % capacity) as usize;
 self.write_slot(header.ring_offset as usize, slot_index, text);
 header.ring_write_count.store(write_count.wrapping_add(1), Ordering::Relaxed);
 true
 }

 /// Drains every currently-available message, in FIFO order. Intended to be called only by
 /// the master.
 pub fn drain_messages(&self) -> Vec<String> {
 let _guard = self.lock.lock();
 let header = self.header();
 let capacity = header.ring_capacity;
 let mut read_count = header.ring_read_count.load(Ordering::Relaxed);
 let write_count = header.ring_write_count.load(Ordering::Relaxed);
 let mut out = Vec::new();
 while read_count != write_count {
 let slot_index = (read_count % capacity) as usize;
 out.push(self.read_slot(header.ring_offset as usize, slot_index));
 read_count = read_count.wrapping_add(1);
 }
 header.ring_read_count.store(read_count, Ordering::Relaxed);
 out
 }

 fn write_slot(&self, ring_offset: usize, slot_index: usize, text: &str) {
 let bytes = text.as_bytes();
 let len = bytes.len().min(RING_SLOT_LEN);
 let offset = ring_offset + slot_index * RING_SLOT_LEN;
 // SAFETY: `offset + RING_SLOT_LEN` is within the mapping by construction — every slot
 // index is reduced modulo `ring_capacity`, and the mapping was sized for exactly that
 // many slots in `initialize`. The cast drops `const`ness only to obtain a raw pointer
 // into memory this struct otherwise only ever touches through atomics or this lock.
 let base = self.header as *mut u8;
 unsafe {
 let dst = base.add(offset);
 std::ptr::write_bytes(dst, 0, RING_SLOT_LEN);
 std::ptr::copy_nonoverlapping(bytes.as_ptr(), dst, len);
 }
 }

 fn read_slot(&self, ring_offset: usize, slot_index: usize) -> String {
 let offset = ring_offset + slot_index * RING_SLOT_LEN;
 let base = self.header.cast::<u8>();
 // SAFETY: same bound as `write_slot`; this only reads the slot bytes.
 let slice = unsafe { std::slice::from_raw_parts(base.add(offset), RING_SLOT_LEN) };
 let end = slice.iter().position(|&b| b == 0).unwrap_or(slice.len());
 String::from_utf8_lossy(&slice[..end]).into_owned()
 }
}

/// Sink a [`crate::master::Master`] narrates its lifecycle to, so an embedder watching from
/// another thread (or, in the source's design, mapping the same region from another process) can
/// read aggregate progress without depending on `Master`'s internals.
///
/// Counters this trait updates use the same `Relaxed` policy as [`ControlBlockHeader`]'s fields;
/// only the started/complete flags need acquire/release, and those go through
/// [`ControlBlockHeader::mark_progress_started`] / [`ControlBlockHeader::mark_progress_complete`]
/// directly.
pub trait MasterObserver: Send + Sync {
 /// One pipeline of `kind` was successfully built.
 fn on_progress(&self, kind: crate::message::PipelineKind);
 /// Pipeline `hash` of `kind` was rejected by the driver's validation layer.
 fn on_validation_failed(&self, kind: crate::message::PipelineKind, hash: fossilize_model::Hash);
 /// A shader module was newly added to the fault set.
 fn on_module_banned(&self);
 /// A worker subprocess reached `Done`.
 fn on_clean_death(&self);
 /// A worker subprocess reached `Failed`, or was respawned after `Crashed`/`TimedOut`.
 fn on_dirty_death(&self);
 /// At least one worker has reported its first progress message.
 fn on_progress_started(&self);
 /// Every worker has reached a terminal state.
 fn on_progress_complete(&self);
}

impl<M: AsMut<[u8]> + AsRef<[u8]> + Send + Sync> MasterObserver for SharedControlBlock<M> {
 fn on_progress(&self, kind: crate::message::PipelineKind) {
 self.header().pipelines[pipeline_kind_index(kind)]
.successes
.fetch_add(1, Ordering::Relaxed);
 }

 fn on_validation_failed(&self, kind: crate::message::PipelineKind, _hash: fossilize_model::Hash) {
 self.header().modules.validation_failed.fetch_add(1, Ordering::Relaxed);
 self.header().pipelines[pipeline_kind_index(kind)]
.failures
.fetch_add(1, Ordering::Relaxed);
 }

 fn on_module_banned(&self) {
 self.header().modules.banned.fetch_add(1, Ordering::Relaxed);
 }

 fn on_clean_death(&self) {
 self.header().clean_process_deaths.fetch_add(1, Ordering::Relaxed);
 }

 fn on_dirty_death(&self) {
 self.header().dirty_process_deaths.fetch_add(1, Ordering::Relaxed);
 }

 fn on_progress_started(&self) {
 self.header().mark_progress_started();
 }

 fn on_progress_complete(&self) {
 self.header().mark_progress_complete();
 }
}
