// SPDX-License-Identifier: Apache-2.0
//! The external-replayer client : a thin façade an embedder links against to
//! launch a replay and poll its progress without depending on `fossilize-orchestrator`'s internal
//! types.
//!
//! [`ReplayClient::launch`] opens the target archive just far enough to learn how many pipelines
//! of each kind it holds, builds a [`SharedControlBlock`] sized for that archive, and starts a
//! [`Master`] on a background thread — the in-process stand-in for the source's "spawn the master
//! as a subprocess", since here the master is a library object the embedder's own process drives
//! rather than a binary it execs. Everything the embedder needs afterward —
//! [`ReplayClient::poll_progress`], [`ReplayClient::wait`], [`ReplayClient::kill`], and the
//! accumulated fault sets — reads state out of that control block or the thread-shared sets
//! [`Master`] was handed at launch, never by reaching into the orchestrator's internals.

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]

mod error;
mod observer;
mod progress;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use fossilize_db::{AccessMode, Archive};
use fossilize_model::{Hash, ResourceTag};
use fossilize_orchestrator::{
 ControlBlockHeader, FaultSet, LocalMutexLock, Master, OrchestratorOutcome, SharedControlBlock, WorkerSpawner,
};

pub use error::ClientError;
pub use progress::{compute_condensed_progress, KindProgress, ModuleProgress, PollStatus, Progress};

use observer::ClientObserver;

/// Tunables [`ReplayClient::launch`] forwards to the underlying [`Master`].
#[derive(Clone, Copy, Debug)]
pub struct ClientConfig {
 /// Number of worker subprocesses to partition the archive across.
 pub worker_count: usize,
 /// How long the master waits after a `CRASH` message before declaring the worker timed out
 ///.
 pub crash_timer: Duration,
 /// How long a `Running` worker may go without a message before it's considered hung.
 pub heartbeat_timeout: Duration,
 /// How long each poll of a worker's pipe blocks before returning `Idle`.
 pub poll_interval: Duration,
}

impl Default for ClientConfig {
 fn default() -> Self {
 Self {
 worker_count: 1,
 crash_timer: Duration::from_secs(30),
 heartbeat_timeout: Duration::from_secs(10),
 poll_interval: Duration::from_millis(50),
 }
 }
}

/// The external-replayer client.
pub struct ReplayClient {
 control_block: Arc<SharedControlBlock<Box<[u8]>>>,
 fault_set: Arc<FaultSet>,
 validation_failed: Arc<Mutex<[Vec<Hash>; 3]>>,
 cancel: Arc<AtomicBool>,
 handle: Mutex<Option<JoinHandle<OrchestratorOutcome>>>,
}

/// Default power-of-two ring capacity for a client-launched control block.
const RING_CAPACITY: u32 = 64;

impl ReplayClient {
 /// Opens `archive_path` read-only, partitions its pipeline index space across
 /// `config.worker_count` workers, and starts the orchestration on a background thread.
 ///
 /// `spawner` is the embedder's [`WorkerSpawner`] — the thing that actually execs a worker
 /// binary; this façade has no opinion on how that binary is found or invoked.
 ///
 /// # Errors
 ///
 /// Returns [`ClientError::Db`] if the archive fails to open, or [`ClientError::Io`] if the
 /// first generation of workers fails to spawn.
 pub fn launch(
 archive_path: impl AsRef<Path>,
 spawner: Box<dyn WorkerSpawner>,
 config: ClientConfig,
 ) -> Result<Self, ClientError> {
 let archive = Archive::open(archive_path, AccessMode::ReadOnly)?;
 let totals = [
 archive.get_hash_list_for_resource_tag(ResourceTag::GraphicsPipeline).len() as u32,
 archive.get_hash_list_for_resource_tag(ResourceTag::ComputePipeline).len() as u32,
 archive.get_hash_list_for_resource_tag(ResourceTag::RaytracingPipeline).len() as u32,
 ];
 let module_total = archive.get_hash_list_for_resource_tag(ResourceTag::ShaderModule).len() as u32;

 let region = vec![0u8; ControlBlockHeader::total_len(RING_CAPACITY as usize)].into_boxed_slice();
 let control_block = Arc::new(SharedControlBlock::initialize(
 region,
 RING_CAPACITY,
 Box::new(LocalMutexLock::new()),
 ));
 for (kind_counters, total) in control_block.header().pipelines.iter().zip(totals) {
 kind_counters.total.store(total, Ordering::Relaxed);
 }
 control_block.header().modules.total.store(module_total, Ordering::Relaxed);

 let fault_set = Arc::new(FaultSet::new());
 let validation_failed = Arc::new(Mutex::new([Vec::new(), Vec::new(), Vec::new()]));
 let cancel = Arc::new(AtomicBool::new(false));

 let observer: Arc<dyn fossilize_orchestrator::MasterObserver> = Arc::new(ClientObserver {
 control_block: Arc::clone(&control_block),
 validation_failed: Arc::clone(&validation_failed),
 });

 let mut master = Master::start(
 spawner,
 [totals[0] as usize, totals[1] as usize, totals[2] as usize],
 config.worker_count,
 Arc::clone(&fault_set),
 config.crash_timer,
 config.heartbeat_timeout,
 config.poll_interval,
 )?
.with_observer(observer)
.with_cancel(Arc::clone(&cancel));

 let handle = std::thread::spawn(move || master.run_to_completion());

 Ok(Self {
 control_block,
 fault_set,
 validation_failed,
 cancel,
 handle: Mutex::new(Some(handle)),
 })
 }

 /// Reads the current aggregate progress and what state the orchestration is in.
 #[must_use]
 pub fn poll_progress(&self) -> (PollStatus, Progress) {
 let progress = Progress::from_header(self.control_block.header());
 let header = self.control_block.header();

 let status = if header.progress_is_complete() {
 PollStatus::Complete
 } else if self.thread_ended_without_completing() {
 PollStatus::Error
 } else if header.progress_has_started() {
 PollStatus::Running
 } else {
 PollStatus::ResultNotReady
 };

 (status, progress)
 }

 fn thread_ended_without_completing(&self) -> bool {
 self.handle
.lock()
.unwrap_or_else(std::sync::PoisonError::into_inner)
.as_ref()
.is_some_and(JoinHandle::is_finished)
 && !self.control_block.header().progress_is_complete()
 }

 /// Blocks until the orchestration reaches a terminal state and returns its outcome.
 ///
 /// # Errors
 ///
 /// Returns [`ClientError::OrchestratorPanicked`] if the background thread panicked, or
 /// [`ClientError::AlreadyJoined`] if this is the second call to `wait`/`kill`.
 pub fn wait(&self) -> Result<OrchestratorOutcome, ClientError> {
 let handle = self
.handle
.lock()
.unwrap_or_else(std::sync::PoisonError::into_inner)
.take()
.ok_or(ClientError::AlreadyJoined)?;
 handle.join().map_err(|_| ClientError::OrchestratorPanicked)
 }

 /// Requests that every still-running worker be terminated, then blocks until the
 /// orchestration's background thread has unwound and returns its (necessarily partial)
 /// outcome.
 ///
 /// # Errors
 ///
 /// Same as [`ReplayClient::wait`].
 pub fn kill(&self) -> Result<OrchestratorOutcome, ClientError> {
 self.cancel.store(true, Ordering::Relaxed);
 self.wait()
 }

 /// Shader-module hashes attributed to at least one crash so far. Safe to call while the orchestration is still running.
 #[must_use]
 pub fn get_faulty_spirv_modules(&self) -> Vec<Hash> {
 self.fault_set.snapshot()
 }

 /// Graphics pipeline hashes the driver's validation layer rejected so far.
 #[must_use]
 pub fn get_graphics_failed_validation(&self) -> Vec<Hash> {
 self.validation_failed_for(0)
 }

 /// Compute pipeline hashes the driver's validation layer rejected so far.
 #[must_use]
 pub fn get_compute_failed_validation(&self) -> Vec<Hash> {
 self.validation_failed_for(1)
 }

 /// Ray tracing pipeline hashes the driver's validation layer rejected so far.
 #[must_use]
 pub fn get_raytracing_failed_validation(&self) -> Vec<Hash> {
 self.validation_failed_for(2)
 }

 fn validation_failed_for(&self, slot: usize) -> Vec<Hash> {
 self.validation_failed
.lock()
.unwrap_or_else(std::sync::PoisonError::into_inner)[slot]
.clone()
 }
}
