// SPDX-License-Identifier: Apache-2.0
//! The background recording worker: a bounded queue and a single task draining it, so a capture
//! layer calling [`fossilize_recorder::Recorder::drain_pending`] on a hot path never blocks on
//! archive I/O itself.

use std::path::PathBuf;

use fossilize_db::{AccessMode, Archive};
use fossilize_model::InternedObject;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::error::WorkerError;
use crate::sync::record_sync;

/// A background task that owns one archive and serializes every write to it.
///
/// Submitting blocks once the queue is at [`RecordingWorker::spawn`]'s `queue_depth` — the same
/// backpressure a bounded channel always gives you — rather than growing without bound while the
/// capture layer outruns the disk.
pub struct RecordingWorker {
 sender: Option<mpsc::Sender<InternedObject>>,
 handle: JoinHandle<Result<usize, WorkerError>>,
}

impl RecordingWorker {
 /// Spawns a worker task that opens `archive_path` in [`AccessMode::Append`] and writes every
 /// submitted object to it, compressing payloads when `compress` is set.
 #[must_use]
 pub fn spawn(archive_path: PathBuf, compress: bool, queue_depth: usize) -> Self {
 let (sender, mut receiver) = mpsc::channel(queue_depth.max(1));
 let handle = tokio::spawn(async move {
 let mut archive = Archive::open(&archive_path, AccessMode::Append)?;
 let mut written = 0usize;
 while let Some(object) = receiver.recv().await {
 record_sync(&mut archive, &object, compress)?;
 written += 1;
 debug!(written, "recorded object");
 }
 Ok(written)
 });
 Self {
 sender: Some(sender),
 handle,
 }
 }

 /// Enqueues an object for recording, waiting for queue space if the worker is backed up.
 ///
 /// # Errors
 ///
 /// Returns [`WorkerError::Closed`] if the worker has already been shut down.
 pub async fn submit(&self, object: InternedObject) -> Result<(), WorkerError> {
 let sender = self.sender.as_ref().ok_or(WorkerError::Closed)?;
 sender.send(object).await.map_err(|_| WorkerError::Closed)
 }

 /// Closes the submission queue and waits for every already-queued object to be written.
 ///
 /// # Errors
 ///
 /// Returns [`WorkerError::TaskFailed`] if the worker task panicked, or whatever
 /// [`WorkerError::Db`] the task itself encountered while writing.
 pub async fn shutdown(mut self) -> Result<usize, WorkerError> {
 self.sender.take();
 match self.handle.await {
 Ok(result) => result,
 Err(join_error) => {
 error!(%join_error, "recording worker task did not exit cleanly");
 Err(WorkerError::TaskFailed)
 }
 }
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use fossilize_model::{NormalizedObject, SamplerInfo};

 fn temp_path(name: &str) -> PathBuf {
 let mut path = std::env::temp_dir();
 path.push(format!(
 "fossilize-worker-async-{name}-{}.foz",
 std::process::id()
 ));
 path
 }

 #[tokio::test]
 async fn submits_and_persists_objects() {
 let path = temp_path("basic");
 let worker = RecordingWorker::spawn(path.clone(), false, 4);

 let object = InternedObject::new(1, NormalizedObject::Sampler(SamplerInfo::new()));
 worker.submit(object).await.unwrap();

 let written = worker.shutdown().await.unwrap();
 assert_eq!(written, 1);

 let archive = Archive::open(&path, AccessMode::ReadOnly).unwrap();
 assert_eq!(archive.len(), 1);
 std::fs::remove_file(&path).ok();
 }

 #[tokio::test]
 async fn submit_after_shutdown_is_rejected() {
 let path = temp_path("after-shutdown");
 let worker = RecordingWorker::spawn(path.clone(), false, 4);
 let written = worker.shutdown().await.unwrap();
 assert_eq!(written, 0);
 std::fs::remove_file(&path).ok();
 }

 #[tokio::test]
 async fn queue_depth_one_still_delivers_every_submission() {
 let path = temp_path("backpressure");
 let worker = RecordingWorker::spawn(path.clone(), false, 1);

 for i in 0..8u64 {
 let object = InternedObject::new(i, NormalizedObject::Sampler(SamplerInfo::new()));
 worker.submit(object).await.unwrap();
 }

 let written = worker.shutdown().await.unwrap();
 assert_eq!(written, 8);
 std::fs::remove_file(&path).ok();
 }
}
