// SPDX-License-Identifier: Apache-2.0
//! Async-signal-safe crash capture for a worker subprocess.
//!
//! The handler installed here does the absolute minimum required to tell the master which
//! modules the in-flight pipeline build depended on: it writes pre-formatted `MODULE` and
//! `CRASH` lines directly to a raw file descriptor with `write(2)` and then calls `_exit(2)`. It
//! never allocates, never unwinds, and never calls back into anything that might itself fault —
//! the bulk of the recovery logic lives in [`crate::master::Master`], which only ever observes
//! this handler's output as ordinary [`crate::message::WorkerMessage`] lines.
#![allow(unsafe_code)]

use std::os::fd::RawFd;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Maximum module dependencies tracked for the pipeline currently being built. Fixed-size so the
/// handler never allocates.
const MAX_TRACKED_MODULES: usize = 8;

/// The crash handler's view of "what is this thread building right now" — updated from ordinary
/// (non-signal) code immediately before and after each pipeline dispatch, and read only from
/// inside the signal handler on the same thread, so no cross-thread synchronization is needed
/// beyond the atomics' own visibility guarantees.
struct CrashContext {
 fd: AtomicUsize,
 module_count: AtomicUsize,
 modules: [AtomicU64; MAX_TRACKED_MODULES],
}

static CONTEXT: CrashContext = CrashContext {
 fd: AtomicUsize::new(usize::MAX),
 module_count: AtomicUsize::new(0),
 modules: [const { AtomicU64::new(0) }; MAX_TRACKED_MODULES],
};

/// Records which shader modules the pipeline about to be dispatched depends on, so a crash
/// during its build can be attributed. Call this immediately before invoking a creator's
/// `enqueue_create_*_pipeline`, and call [`clear_current_dependencies`] immediately after it
/// returns (success or error — only a crash leaves the context stale, and a stale context just
/// means a later crash over-attributes to a pipeline that already finished, which the master
/// tolerates as a conservative fault guess).
pub fn set_current_dependencies(modules: &[u64]) {
 let count = modules.len().min(MAX_TRACKED_MODULES);
 for (slot, &hash) in CONTEXT.modules.iter().zip(modules.iter()).take(count) {
 slot.store(hash, Ordering::Relaxed);
 }
 CONTEXT.module_count.store(count, Ordering::Release);
}

/// Clears the current-dependency context once a pipeline build finishes without crashing.
pub fn clear_current_dependencies() {
 CONTEXT.module_count.store(0, Ordering::Release);
}

/// Installs one-shot handlers for the signals a crashing driver call is expected to raise, each
/// using an alternate signal stack so the handler survives stack overflow.
///
/// `fd` is the raw file descriptor the handler writes `MODULE`/`CRASH` lines to — ordinarily the
/// worker's stdout, already connected to the master's read end of the IPC pipe.
///
/// # Safety
///
/// Must be called once, early in the worker process's life, before any thread starts building
/// pipelines. `fd` must remain open and valid for the remaining lifetime of the process.
pub unsafe fn install(fd: RawFd) {
 CONTEXT.fd.store(fd as usize, Ordering::Release);

 static mut ALT_STACK: [u8; libc::SIGSTKSZ] = [0; libc::SIGSTKSZ];
 let stack = libc::stack_t {
 ss_sp: std::ptr::addr_of_mut!(ALT_STACK).cast(),
 ss_flags: 0,
 ss_size: libc::SIGSTKSZ,
 };
 libc::sigaltstack(&raw const stack, std::ptr::null_mut());

 let mut action: libc::sigaction = std::mem::zeroed();
 action.sa_sigaction = handle_fatal_signal as usize;
 action.sa_flags = libc::SA_SIGINFO | libc::SA_ONSTACK | libc::SA_RESETHAND;
 libc::sigemptyset(&raw mut action.sa_mask);

 for signal in [libc::SIGSEGV, libc::SIGABRT, libc::SIGILL, libc::SIGFPE, libc::SIGBUS] {
 libc::sigaction(signal, &raw const action, std::ptr::null_mut());
 }
}

/// The actual signal handler. Async-signal-safe: only reads already-initialized atomics, formats
/// into a fixed stack buffer with no allocation, and calls `write`/`_exit` directly.
extern "C" fn handle_fatal_signal(_sig: libc::c_int, _info: *mut libc::siginfo_t, _ctx: *mut libc::c_void) {
 let fd = CONTEXT.fd.load(Ordering::Acquire);
 if fd != usize::MAX {
 let count = CONTEXT.module_count.load(Ordering::Acquire).min(MAX_TRACKED_MODULES);
 for slot in CONTEXT.modules.iter().take(count) {
 let hash = slot.load(Ordering::Relaxed);
 write_line(fd as RawFd, b"MODULE ", hash);
 }
 write_bytes(fd as RawFd, b"CRASH\n");
 }
 // SAFETY: `_exit` never returns and performs no cleanup, matching the "do not unwind, do not
 // free" discipline this module requires.
 unsafe { libc::_exit(2) };
}

/// Writes `prefix` followed by `hash` hex-formatted (16 lowercase digits) and a newline, using
/// only stack buffers and raw `write(2)`.
fn write_line(fd: RawFd, prefix: &[u8], hash: u64) {
 let mut buf = [0u8; 32];
 let mut len = 0;
 for &b in prefix {
 buf[len] = b;
 len += 1;
 }
 const HEX: &[u8; 16] = b"0123456789abcdef";
 for shift in (0..16).rev() {
 let nibble = ((hash >> (shift * 4)) & 0xf) as usize;
 buf[len] = HEX[nibble];
 len += 1;
 }
 buf[len] = b'\n';
 len += 1;
 write_bytes(fd, &buf[..len]);
}

fn write_bytes(fd: RawFd, bytes: &[u8]) {
 // SAFETY: `write` with a valid fd and a slice's own pointer/length is a plain syscall;
 // short writes are ignored here deliberately — this is best-effort diagnostic output
 // emitted microseconds before the process exits, not a channel with delivery guarantees.
 unsafe {
 libc::write(fd, bytes.as_ptr().cast(), bytes.len());
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn set_and_clear_dependencies_round_trip_through_atomics() {
 set_current_dependencies(&[1, 2, 3]);
 assert_eq!(CONTEXT.module_count.load(Ordering::Acquire), 3);
 clear_current_dependencies();
 assert_eq!(CONTEXT.module_count.load(Ordering::Acquire), 0);
 }

 #[test]
 fn truncates_to_max_tracked_modules() {
 let many: Vec<u64> = (0..20).collect();
 set_current_dependencies(&many);
 assert_eq!(CONTEXT.module_count.load(Ordering::Acquire), MAX_TRACKED_MODULES);
 clear_current_dependencies();
 }
}
