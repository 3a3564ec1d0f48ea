// SPDX-License-Identifier: Apache-2.0
//! The cross-process lock protecting [`crate::control_block::SharedControlBlock`]'s ring buffer
//!.
//!
//! Two implementations exist behind one [`RingLock`] trait: [`FutexLock`], grounded on the
//! original's `platform/futex_wrapper_linux.hpp` and built from a raw `i32` futex word plus the
//! `futex(2)` syscall; and [`LocalMutexLock`], a portable fallback for non-Linux targets (and for
//! tests, which never cross a process boundary) backed by a plain [`std::sync::Mutex`]. Only
//! [`FutexLock`] is meant to be shared across real process boundaries — `LocalMutexLock` is
//! correct only within one address space.
#![allow(unsafe_code)]

use std::sync::Mutex;

/// An RAII guard that releases a [`RingLock`] on drop.
pub trait RingLockGuard {}

/// A lock over the ring buffer's cursors and slot bytes, shareable across processes.
///
/// Implementations must be `Send + Sync`: the same `Box<dyn RingLock>` is held by
/// [`crate::control_block::SharedControlBlock`] and may be locked from any thread that touches
/// the block.
pub trait RingLock: Send + Sync {
 /// Blocks until the lock is held, returning a guard that releases it on drop.
 fn lock(&self) -> Box<dyn RingLockGuard + '_>;
}

/// A portable, single-address-space fallback lock.
///
/// Correct for tests and for embedding scenarios that never actually fork a worker process (the
/// orchestrator still builds on non-Unix targets, even though spec.md's crash-recovery scenarios
/// are only exercised on Linux).
pub struct LocalMutexLock {
 inner: Mutex<()>,
}

impl LocalMutexLock {
 /// A fresh, unlocked mutex.
 #[must_use]
 pub fn new() -> Self {
 Self { inner: Mutex::new(()) }
 }
}

impl Default for LocalMutexLock {
 fn default() -> Self {
 Self::new()
 }
}

struct LocalMutexGuard<'a>(std::sync::MutexGuard<'a, ()>);
impl RingLockGuard for LocalMutexGuard<'_> {}

impl RingLock for LocalMutexLock {
 fn lock(&self) -> Box<dyn RingLockGuard + '_> {
 let guard = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
 Box::new(LocalMutexGuard(guard))
 }
}

/// A raw futex word, stored inline in the shared region so every process maps the same byte —
/// unlike a `std::sync::Mutex`, which is not POD and cannot safely live in memory another
/// process's address space also maps.
#[cfg(target_os = "linux")]
pub struct FutexLock {
 word: *const std::sync::atomic::AtomicI32,
}

#[cfg(target_os = "linux")]
// SAFETY: the pointee is accessed only through atomic operations and the futex syscall, both of
// which are safe to race across threads by construction.
unsafe impl Send for FutexLock {}
#[cfg(target_os = "linux")]
// SAFETY: same reasoning as the `Send` impl above.
unsafe impl Sync for FutexLock {}

#[cfg(target_os = "linux")]
impl FutexLock {
 const UNLOCKED: i32 = 0;
 const LOCKED: i32 = 1;
 const LOCKED_CONTENDED: i32 = 2;

 /// Wraps a pointer to a 4-byte-aligned `i32` word inside a shared-memory region.
 ///
 /// # Safety
 ///
 /// `word` must point to valid, 4-byte-aligned, writable memory for as long as any
 /// `FutexLock` built from it is alive, and must not be accessed through any other
 /// synchronization primitive concurrently.
 #[must_use]
 pub unsafe fn from_raw(word: *mut std::sync::atomic::AtomicI32) -> Self {
 Self { word: word.cast_const() }
 }

 fn futex_wait(&self, expected: i32) {
 // SAFETY: `self.word` is valid for the lifetime of `self` per the `from_raw` contract.
 unsafe {
 libc::syscall(
 libc::SYS_futex,
 self.word,
 libc::FUTEX_WAIT,
 expected,
 std::ptr::null::<libc::timespec>(),
 );
 }
 }

 fn futex_wake_one(&self) {
 // SAFETY: same as `futex_wait`.
 unsafe {
 libc::syscall(libc::SYS_futex, self.word, libc::FUTEX_WAKE, 1i32);
 }
 }

 fn word(&self) -> &std::sync::atomic::AtomicI32 {
 // SAFETY: `from_raw`'s contract guarantees this pointer stays valid and exclusively
 // managed through atomics for `self`'s lifetime.
 unsafe { &*self.word }
 }
}

#[cfg(target_os = "linux")]
struct FutexGuard<'a>(&'a FutexLock);
#[cfg(target_os = "linux")]
impl RingLockGuard for FutexGuard<'_> {}

#[cfg(target_os = "linux")]
impl Drop for FutexGuard<'_> {
 fn drop(&mut self) {
 use std::sync::atomic::Ordering;
 if self.0.word().swap(Self::UNLOCKED, Ordering::Release) == Self::LOCKED_CONTENDED {
 self.0.futex_wake_one();
 }
 }
}

#[cfg(target_os = "linux")]
impl RingLock for FutexLock {
 fn lock(&self) -> Box<dyn RingLockGuard + '_> {
 use std::sync::atomic::Ordering;
 let mut state = self.word().compare_exchange(
 Self::UNLOCKED,
 Self::LOCKED,
 Ordering::Acquire,
 Ordering::Acquire,
 );
 if state.is_err() {
 loop {
 let previous = self.word().swap(Self::LOCKED_CONTENDED, Ordering::Acquire);
 if previous == Self::UNLOCKED {
 break;
 }
 self.futex_wait(Self::LOCKED_CONTENDED);
 }
 state = Ok(Self::UNLOCKED);
 }
 debug_assert!(state.is_ok());
 Box::new(FutexGuard(self))
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn local_mutex_lock_serializes_access() {
 let lock = LocalMutexLock::new();
 let _guard = lock.lock();
 drop(_guard);
 let _guard2 = lock.lock();
 }

 #[cfg(target_os = "linux")]
 #[test]
 fn futex_lock_round_trips_on_a_local_word() {
 use std::sync::atomic::AtomicI32;
 let word = AtomicI32::new(0);
 // SAFETY: `word` is a local, live, 4-byte-aligned `AtomicI32` for the whole test.
 let lock = unsafe { FutexLock::from_raw(std::ptr::addr_of!(word).cast_mut()) };
 {
 let _guard = lock.lock();
 }
 let _guard = lock.lock();
 }
}
