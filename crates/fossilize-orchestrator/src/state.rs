// SPDX-License-Identifier: Apache-2.0
//! The per-worker state machine.

use std::fmt;

/// One worker subprocess's lifecycle state, as tracked by the master.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerState {
 /// Spawned, but no progress message has arrived yet.
 Starting,
 /// Actively replaying and reporting progress.
 Running,
 /// Caught a fatal signal; the master has armed a timer waiting for a clean exit.
 Crashed,
 /// The crash timer expired before the worker exited.
 TimedOut,
 /// Exited cleanly; this worker's assigned range is fully replayed.
 Done,
 /// Exited (or was killed) without ever making progress; its range is abandoned, not retried.
 Failed,
}

impl fmt::Display for WorkerState {
 fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
 let name = match self {
 WorkerState::Starting => "starting",
 WorkerState::Running => "running",
 WorkerState::Crashed => "crashed",
 WorkerState::TimedOut => "timed_out",
 WorkerState::Done => "done",
 WorkerState::Failed => "failed",
 };
 f.write_str(name)
 }
}

/// The events the master can observe about one worker subprocess.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerEvent {
 /// A `GRAPHICS`/`COMPUTE`/`RAYTRACE` progress, `MODULE`, `MODULE_UUID`, or validation-failure
 /// message arrived.
 Progress,
 /// A `CRASH` message arrived.
 Crash,
 /// The crash timer armed on [`WorkerEvent::Crash`] expired.
 CrashTimerExpired,
 /// The process exited with status `0`.
 ExitClean,
 /// The process exited with status `2` (a controlled exit after a caught signal).
 ExitControlled,
 /// The process exited due to an uncaught fatal signal, or any status other than `0`/`2`.
 ExitAbnormal,
}

/// Applies one observed event to a worker's current state, per spec.md §4.7's transition table.
///
/// Returns the new state. An event that has no transition defined for the current state leaves
/// the state unchanged — e.g. a stray `HEARTBEAT` after `Done` is simply ignored by the caller
/// (translated to [`WorkerEvent::Progress`] upstream, which is a no-op once terminal).
#[must_use]
pub fn transition(state: WorkerState, event: WorkerEvent, saw_progress: bool) -> WorkerState {
 match (state, event) {
 (WorkerState::Starting, WorkerEvent::Progress) => WorkerState::Running,
 (WorkerState::Starting, WorkerEvent::Crash) => WorkerState::Crashed,
 (WorkerState::Starting, WorkerEvent::ExitClean) => WorkerState::Done,
 (WorkerState::Starting, WorkerEvent::ExitAbnormal) => WorkerState::Failed,

 (WorkerState::Running, WorkerEvent::Progress) => WorkerState::Running,
 (WorkerState::Running, WorkerEvent::Crash) => WorkerState::Crashed,
 (WorkerState::Running, WorkerEvent::ExitClean) => WorkerState::Done,
 (WorkerState::Running, WorkerEvent::ExitAbnormal) => WorkerState::Failed,
 (WorkerState::Running, WorkerEvent::ExitControlled) => WorkerState::Crashed,

 // Crashed -> Done requires a clean-looking exit (status 2) *and* progress markers having
 // been observed before the timer fired; otherwise it's abandoned.
 (WorkerState::Crashed, WorkerEvent::ExitControlled) if saw_progress => WorkerState::Done,
 (WorkerState::Crashed, WorkerEvent::ExitControlled) => WorkerState::Failed,
 (WorkerState::Crashed, WorkerEvent::ExitClean) => WorkerState::Done,
 (WorkerState::Crashed, WorkerEvent::CrashTimerExpired) => WorkerState::TimedOut,
 (WorkerState::Crashed, WorkerEvent::Progress) => WorkerState::Crashed,

 // Once TimedOut, Failed, or Done, the state is terminal from the master's point of view:
 // respawn decisions are made by `Master`, not by further transitions here.
 (terminal, _) => terminal,
 }
}

/// `true` if `state` is one the master should respawn a fresh worker for (assuming the
/// underlying partition still has unfinished work).
#[must_use]
pub const fn should_respawn(state: WorkerState) -> bool {
 matches!(state, WorkerState::Crashed | WorkerState::TimedOut)
}

/// `true` if `state` means this worker's partition should be abandoned rather than retried
///.
#[must_use]
pub const fn is_abandoned(state: WorkerState) -> bool {
 matches!(state, WorkerState::Failed)
}

/// `true` if `state` is terminal and requires no further action from the master.
#[must_use]
pub const fn is_settled(state: WorkerState) -> bool {
 matches!(state, WorkerState::Done | WorkerState::Failed)
}
