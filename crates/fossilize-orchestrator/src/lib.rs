// SPDX-License-Identifier: Apache-2.0
//! The crash-tolerant master/worker replay orchestrator.
//!
//! A [`master::Master`] partitions a pipeline index space evenly across N worker subprocesses,
//! spawns them, and drives each through [`state::WorkerState`]'s lifecycle as
//! [`message::WorkerMessage`]s arrive on its stdout pipe. A worker that crashes or hangs is
//! respawned with an updated [`fault_set::FaultSet`] and a resume point computed from its last
//! reported progress, never losing forward progress and never re-dispatching a pipeline that
//! depends on a module already known to crash the driver.
//!
//! Everything shared across the process boundary — aggregate counters and a small message log —
//! lives in one [`control_block::SharedControlBlock`]; everything else here is per-process.
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]

pub mod control_block;
pub mod error;
pub mod fault_set;
pub mod master;
pub mod message;
pub mod partition;
pub mod process;
pub mod ring_lock;
#[cfg(unix)]
pub mod signal_unix;
pub mod state;
pub mod worker_runtime;

pub use control_block::{pipeline_kind_index, ControlBlockHeader, MasterObserver, SharedControlBlock};
pub use error::OrchestratorError;
pub use fault_set::FaultSet;
pub use master::{Master, OrchestratorOutcome, WorkerSpawner};
pub use message::{PipelineKind, WorkerMessage};
pub use partition::{partition_evenly, resume_start, Partition};
pub use process::{OsWorkerProcess, PollOutcome, WorkerExit, WorkerProcess};
pub use ring_lock::{LocalMutexLock, RingLock};
pub use state::{is_abandoned, is_settled, should_respawn, transition, WorkerEvent, WorkerState};
pub use worker_runtime::{run_worker, validation_rejected, PartitionedCreator, ValidationRejected};

#[cfg(target_os = "linux")]
pub use ring_lock::FutexLock;
