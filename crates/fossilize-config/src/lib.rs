// SPDX-License-Identifier: Apache-2.0
//! Configuration for Fossilize's tunables: crash/heartbeat timers, worker pool size, and the
//! recording worker's queue depth and sync/async mode.
//!
//! Mirrors the teacher's `echo-app-core` + `echo-config-fs` split — a storage-agnostic
//! [`ConfigStore`] port, a typed [`ConfigService`] on top of it, and a filesystem adapter
//! ([`FsConfigStore`]) rooted at the platform config directory.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]

mod fs_store;
mod port;
mod tunables;

pub use fs_store::FsConfigStore;
pub use port::{ConfigError, ConfigService, ConfigStore};
pub use tunables::{
    FossilizeConfig, OrchestratorConfig, RecorderConfig, DEFAULT_CRASH_TIMER_SECS,
    DEFAULT_HEARTBEAT_INTERVAL_SECS, DEFAULT_QUEUE_DEPTH,
};
