// SPDX-License-Identifier: Apache-2.0
//! The tunables the original hardcodes as constants or CLI flags (spec.md SPEC_FULL §1.3):
//! the orchestrator's crash timer, heartbeat interval, worker thread pool size, and the
//! recording worker's queue depth. CLI parsing is out of scope (spec.md §1), so these become
//! plain config fields an embedder can override.

use serde::{Deserialize, Serialize};

/// Default wall-clock timeout the orchestrator arms after a worker reports `CRASH`
/// (spec.md §4.7).
pub const DEFAULT_CRASH_TIMER_SECS: u64 = 30;

/// Default interval between expected `HEARTBEAT` messages before a worker is considered hung
/// (spec.md §4.7 "per-pipeline heartbeat timer").
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 10;

/// Default bound on the recording worker's capture queue (spec.md §4.5) before the capture
/// thread blocks.
pub const DEFAULT_QUEUE_DEPTH: usize = 256;

/// Tunable parameters for the recording worker (C5).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Bounded-queue capacity between the capture side and the background recording worker.
    pub queue_depth: usize,
    /// When `true`, the capture thread encodes and writes inline instead of enqueuing
    /// (spec.md §4.5's "synchronous mode", used when crash recovery is expected to be fragile).
    pub synchronous: bool,
}

impl RecorderConfig {
    /// The original's defaults: a queue depth of 256, asynchronous mode.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            queue_depth: DEFAULT_QUEUE_DEPTH,
            synchronous: false,
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Tunable parameters for the orchestrator (C7).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Seconds the master waits after a `CRASH` message before declaring the worker timed out
    /// (spec.md §4.7).
    pub crash_timer_secs: u64,
    /// Seconds between expected heartbeats during `Running` before the worker is considered
    /// hung (spec.md §4.7, §9 "process_heartbeats" supplement).
    pub heartbeat_interval_secs: u64,
    /// Number of worker subprocesses to fork/spawn. `None` means "one per hardware thread",
    /// the original's default.
    pub worker_count: Option<usize>,
}

impl OrchestratorConfig {
    /// The original's defaults: a 30-second crash timer, a 10-second heartbeat window, and
    /// one worker per hardware thread.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            crash_timer_secs: DEFAULT_CRASH_TIMER_SECS,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
            worker_count: None,
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The complete set of Fossilize's runtime tunables, as one serializable document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FossilizeConfig {
    /// Recording worker tunables.
    pub recorder: RecorderConfig,
    /// Orchestrator tunables.
    pub orchestrator: OrchestratorConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_original_constants() {
        let config = FossilizeConfig::default();
        assert_eq!(config.orchestrator.crash_timer_secs, 30);
        assert_eq!(config.recorder.queue_depth, 256);
        assert!(!config.recorder.synchronous);
    }

    #[test]
    fn round_trips_through_json() {
        let config = FossilizeConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: FossilizeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
