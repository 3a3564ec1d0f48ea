// SPDX-License-Identifier: Apache-2.0
//! Orchestrator error type.

/// Everything that can go wrong standing up or driving an orchestration.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
 /// Spawning or communicating with a worker subprocess failed at the OS level.
 #[error("worker process I/O failed")]
 Io(#[from] std::io::Error),

 /// The archive the orchestrator was asked to replay failed to open or scan.
 #[error("archive failed to open")]
 Db(#[from] fossilize_db::DbError),

 /// A worker subprocess raised a fatal signal; recovered via respawn, but surfaced here for
 /// callers that want to observe it rather than only reading aggregate counters.
 #[error("worker subprocess crashed")]
 CrashDetected,

 /// A worker subprocess made no progress inside its heartbeat window and was terminated.
 #[error("worker subprocess timed out")]
 TimeoutDetected,

 /// A worker's assigned range was abandoned because the worker exited abnormally without
 /// ever reporting progress.
 #[error("worker {worker_id} failed before making any progress; its range was abandoned")]
 WorkerAbandoned {
 /// Index of the worker (0-based) that was abandoned.
 worker_id: usize,
 },

 /// A shared-memory control block was mapped before it had been initialized.
 #[error("shared control block has not been initialized")]
 ControlBlockNotInitialized,
}
