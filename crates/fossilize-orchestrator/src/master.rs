// SPDX-License-Identifier: Apache-2.0
//! The master side of the orchestrator : spawns and respawns workers, attributes
//! crashes to shader modules, and tracks forward progress per pipeline kind until every worker
//! reaches a terminal state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use fossilize_model::Hash;
use tracing::{info, warn};

use crate::control_block::MasterObserver;
use crate::fault_set::FaultSet;
use crate::message::{PipelineKind, WorkerMessage};
use crate::partition::{partition_evenly, resume_start, Partition};
use crate::process::{PollOutcome, WorkerExit, WorkerProcess};
use crate::state::{self, WorkerEvent, WorkerState};

/// Counts for one pipeline kind across the whole orchestration, for the final report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindOutcome {
 /// Highest index successfully completed (inclusive), or `None` if nothing completed.
 pub completed_through: Option<usize>,
 /// Indices from `completed_through + 1` to this kind's partition end that were abandoned
 /// because their worker failed before making progress.
 pub abandoned: usize,
}

/// Everything the master learned by the time every worker reached a terminal state.
#[derive(Debug, Default)]
pub struct OrchestratorOutcome {
 /// Per-pipeline-kind completion summary, indexed by [`crate::control_block::pipeline_kind_index`].
 pub kinds: [KindOutcome; 3],
 /// Clean (`exit 0`) process terminations.
 pub clean_process_deaths: u32,
 /// Dirty (crash/timeout/abnormal-exit) process terminations.
 pub dirty_process_deaths: u32,
 /// Module hashes attributed to at least one crash.
 pub faulty_modules: Vec<Hash>,
 /// Pipelines the validation layer rejected, keyed by kind index.
 pub validation_failed: [Vec<Hash>; 3],
}

impl OrchestratorOutcome {
 /// The final orchestrator return code : bitwise-zero if everything compiled or
 /// was cleanly skipped, nonzero if at least one dirty process death was observed.
 #[must_use]
 pub const fn exit_code(&self) -> i32 {
 if self.dirty_process_deaths > 0 {
 1
 } else {
 0
 }
 }
}

/// Spawns worker subprocesses on demand. Implemented for real use by something that shells out
/// to a worker binary; tests implement it against an in-memory fake.
pub trait WorkerSpawner {
 /// Spawns worker `worker_id`, which will replay `partitions` (one range per pipeline kind,
 /// indexed by [`crate::control_block::pipeline_kind_index`]) and has already been told
 /// `fault_payload` (the [`FaultSet::to_startup_payload`] output) on stdin.
 fn spawn(
 &self,
 worker_id: usize,
 partitions: [Partition; 3],
 fault_payload: &str,
 ) -> std::io::Result<Box<dyn WorkerProcess>>;
}

struct WorkerRuntime {
 process: Box<dyn WorkerProcess>,
 state: WorkerState,
 saw_progress: bool,
 crash_deadline: Option<Instant>,
 last_heartbeat: Instant,
 partitions: [Partition; 3],
 last_progress: [Option<(usize, Hash)>; 3],
}

/// Drives a full replay across respawning worker subprocesses.
pub struct Master {
 spawner: Box<dyn WorkerSpawner>,
 fault_set: Arc<FaultSet>,
 crash_timer: Duration,
 heartbeat_timeout: Duration,
 poll_interval: Duration,
 workers: Vec<WorkerRuntime>,
 next_worker_id: usize,
 clean_process_deaths: u32,
 dirty_process_deaths: u32,
 validation_failed: [Vec<Hash>; 3],
 observer: Option<Arc<dyn MasterObserver>>,
 progress_started_notified: bool,
 cancel: Option<Arc<AtomicBool>>,
}

impl Master {
 /// Starts an orchestration: partitions `totals` (one pipeline count per kind) evenly across
 /// `worker_count` workers and spawns the first generation.
 ///
 /// # Errors
 ///
 /// Returns the first [`std::io::Error`] any initial spawn reports.
 pub fn start(
 spawner: Box<dyn WorkerSpawner>,
 totals: [usize; 3],
 worker_count: usize,
 fault_set: Arc<FaultSet>,
 crash_timer: Duration,
 heartbeat_timeout: Duration,
 poll_interval: Duration,
 ) -> std::io::Result<Self> {
 let per_kind: [Vec<Partition>; 3] = [
 partition_evenly(totals[0], worker_count),
 partition_evenly(totals[1], worker_count),
 partition_evenly(totals[2], worker_count),
 ];

 let mut master = Self {
 spawner,
 fault_set,
 crash_timer,
 heartbeat_timeout,
 poll_interval,
 workers: Vec::with_capacity(worker_count),
 next_worker_id: 0,
 clean_process_deaths: 0,
 dirty_process_deaths: 0,
 validation_failed: [Vec::new(), Vec::new(), Vec::new()],
 observer: None,
 progress_started_notified: false,
 cancel: None,
 };

 for worker_id in 0..worker_count {
 let partitions = [
 per_kind[0].get(worker_id).copied().unwrap_or(Partition { start: 0, end: 0 }),
 per_kind[1].get(worker_id).copied().unwrap_or(Partition { start: 0, end: 0 }),
 per_kind[2].get(worker_id).copied().unwrap_or(Partition { start: 0, end: 0 }),
 ];
 master.spawn_worker(partitions)?;
 }

 Ok(master)
 }

 /// Attaches an observer (typically a [`crate::control_block::SharedControlBlock`]) that is
 /// narrated every progress, death, and ban event as this master drives its workers — the
 /// channel the external-replayer client polls for aggregate progress.
 #[must_use]
 pub fn with_observer(mut self, observer: Arc<dyn MasterObserver>) -> Self {
 self.observer = Some(observer);
 self
 }

 /// Attaches a cooperative cancellation flag: once set, the next [`Master::step`] terminates
 /// every still-running worker and abandons its range, so a [`Master::run_to_completion`] loop
 /// driven on another thread unwinds the way the external-replayer client's `kill()` is expected to.
 #[must_use]
 pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
 self.cancel = Some(cancel);
 self
 }

 fn spawn_worker(&mut self, partitions: [Partition; 3]) -> std::io::Result<()> {
 let worker_id = self.next_worker_id;
 self.next_worker_id += 1;
 let payload = self.fault_set.to_startup_payload();
 info!(worker_id, ?partitions, "spawning worker");
 let process = self.spawner.spawn(worker_id, partitions, &payload)?;
 self.workers.push(WorkerRuntime {
 process,
 state: WorkerState::Starting,
 saw_progress: false,
 crash_deadline: None,
 last_heartbeat: Instant::now(),
 partitions,
 last_progress: [None, None, None],
 });
 Ok(())
 }

 /// Drives every worker to a terminal state, respawning across crashes and timeouts, and
 /// returns the aggregated outcome.
 pub fn run_to_completion(&mut self) -> OrchestratorOutcome {
 loop {
 self.step();
 if self.workers.iter().all(|w| state::is_settled(w.state)) {
 break;
 }
 }
 if let Some(observer) = &self.observer {
 observer.on_progress_complete();
 }
 self.finish()
 }

 /// Advances every still-active worker by one poll cycle. Exposed separately from
 /// [`Master::run_to_completion`] so tests can assert on intermediate state.
 pub fn step(&mut self) {
 let mut respawns: Vec<[Partition; 3]> = Vec::new();

 if self.cancel.as_deref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
 for worker in &mut self.workers {
 if state::is_settled(worker.state) {
 continue;
 }
 worker.process.terminate();
 worker.state = WorkerState::Failed;
 self.dirty_process_deaths += 1;
 if let Some(observer) = &self.observer {
 observer.on_dirty_death();
 }
 }
 return;
 }

 for worker in &mut self.workers {
 if state::is_settled(worker.state) {
 continue;
 }

 match worker.process.poll(self.poll_interval) {
 PollOutcome::Message(message) => {
 Self::handle_message(
 worker,
 message,
 &self.fault_set,
 self.crash_timer,
 &mut self.validation_failed,
 self.observer.as_deref(),
 );
 if !self.progress_started_notified {
 self.progress_started_notified = true;
 if let Some(observer) = &self.observer {
 observer.on_progress_started();
 }
 }
 }
 PollOutcome::Garbled(line) => {
 warn!(%line, "worker sent an unparseable message");
 }
 PollOutcome::Idle => {
 if worker.state == WorkerState::Crashed {
 if let Some(deadline) = worker.crash_deadline {
 if Instant::now() >= deadline {
 worker.state =
 state::transition(worker.state, WorkerEvent::CrashTimerExpired, worker.saw_progress);
 }
 }
 } else if worker.state == WorkerState::Running
 && worker.last_heartbeat.elapsed() > self.heartbeat_timeout
 {
 worker.process.terminate();
 worker.state = WorkerState::Crashed;
 worker.crash_deadline = Some(Instant::now());
 }
 }
 PollOutcome::Exited(exit) => {
 let event = match exit {
 WorkerExit::Clean => WorkerEvent::ExitClean,
 WorkerExit::Controlled => WorkerEvent::ExitControlled,
 WorkerExit::Abnormal => WorkerEvent::ExitAbnormal,
 };
 let previous = worker.state;
 worker.state = state::transition(worker.state, event, worker.saw_progress);
 match worker.state {
 WorkerState::Done => {
 self.clean_process_deaths += 1;
 if let Some(observer) = &self.observer {
 observer.on_clean_death();
 }
 }
 WorkerState::Failed => {
 self.dirty_process_deaths += 1;
 warn!(?previous, "worker abandoned its range");
 if let Some(observer) = &self.observer {
 observer.on_dirty_death();
 }
 }
 _ => {}
 }
 }
 }

 }

 // Second pass: collect any worker that settled into Crashed/TimedOut this step and
 // compute its respawn partitions, now that no other borrow of `self.workers` is live.
 for worker in &self.workers {
 if state::should_respawn(worker.state) {
 let resumed = [
 Partition {
 start: resume_start(
 worker.last_progress[0].map(|(i, _)| i),
 worker.partitions[0].start,
 )
.min(worker.partitions[0].end),
 end: worker.partitions[0].end,
 },
 Partition {
 start: resume_start(
 worker.last_progress[1].map(|(i, _)| i),
 worker.partitions[1].start,
 )
.min(worker.partitions[1].end),
 end: worker.partitions[1].end,
 },
 Partition {
 start: resume_start(
 worker.last_progress[2].map(|(i, _)| i),
 worker.partitions[2].start,
 )
.min(worker.partitions[2].end),
 end: worker.partitions[2].end,
 },
 ];
 self.dirty_process_deaths += 1;
 if let Some(observer) = &self.observer {
 observer.on_dirty_death();
 }
 respawns.push(resumed);
 }
 }

 // Mark every respawned worker settled (its lineage continues under a new worker id) and
 // spawn its successor.
 for worker in &mut self.workers {
 if state::should_respawn(worker.state) {
 worker.state = WorkerState::Done;
 }
 }
 for partitions in respawns {
 if partitions.iter().all(Partition::is_empty) {
 continue;
 }
 if let Err(error) = self.spawn_worker(partitions) {
 warn!(%error, "failed to respawn worker");
 }
 }
 }

 fn handle_message(
 worker: &mut WorkerRuntime,
 message: WorkerMessage,
 fault_set: &FaultSet,
 crash_timer: Duration,
 validation_failed: &mut [Vec<Hash>; 3],
 observer: Option<&dyn MasterObserver>,
 ) {
 worker.last_heartbeat = Instant::now();
 match message {
 WorkerMessage::Heartbeat => {
 worker.state = state::transition(worker.state, WorkerEvent::Progress, worker.saw_progress);
 }
 WorkerMessage::Crash => {
 worker.state = state::transition(worker.state, WorkerEvent::Crash, worker.saw_progress);
 worker.crash_deadline = Some(Instant::now() + crash_timer);
 }
 WorkerMessage::Module(hash) => {
 if fault_set.insert(hash) {
 if let Some(observer) = observer {
 observer.on_module_banned();
 }
 }
 worker.state = state::transition(worker.state, WorkerEvent::Progress, worker.saw_progress);
 }
 WorkerMessage::ModuleUuid(_) => {
 worker.state = state::transition(worker.state, WorkerEvent::Progress, worker.saw_progress);
 }
 WorkerMessage::ValidationFailed { kind, hash } => {
 validation_failed[crate::control_block::pipeline_kind_index(kind)].push(hash);
 if let Some(observer) = observer {
 observer.on_validation_failed(kind, hash);
 }
 worker.state = state::transition(worker.state, WorkerEvent::Progress, worker.saw_progress);
 }
 WorkerMessage::Progress { kind, index, hash } => {
 let slot = crate::control_block::pipeline_kind_index(kind);
 worker.last_progress[slot] = Some((index as usize, hash));
 worker.saw_progress = true;
 worker.state = state::transition(worker.state, WorkerEvent::Progress, true);
 if let Some(observer) = observer {
 observer.on_progress(kind);
 }
 }
 }
 }

 fn finish(&mut self) -> OrchestratorOutcome {
 let mut kinds = [KindOutcome::default(); 3];
 for worker in &self.workers {
 for (slot, kind) in kinds.iter_mut().enumerate() {
 if let Some((index, _)) = worker.last_progress[slot] {
 kind.completed_through = Some(kind.completed_through.map_or(index, |prev| prev.max(index)));
 }
 }
 }
 OrchestratorOutcome {
 kinds,
 clean_process_deaths: self.clean_process_deaths,
 dirty_process_deaths: self.dirty_process_deaths,
 faulty_modules: self.fault_set.snapshot(),
 validation_failed: std::mem::take(&mut self.validation_failed),
 }
 }
}

/// Per-worker message-routing tallies, kept for diagnostics / the external-replayer client.
#[derive(Debug, Default)]
pub struct ProgressTally {
 inner: HashMap<PipelineKind, (u64, u64)>,
}

impl ProgressTally {
 /// Records one completion for `kind`.
 pub fn record(&mut self, kind: PipelineKind) {
 let entry = self.inner.entry(kind).or_insert((0, 0));
 entry.0 += 1;
 }

 /// Records one skip for `kind`.
 pub fn record_skip(&mut self, kind: PipelineKind) {
 let entry = self.inner.entry(kind).or_insert((0, 0));
 entry.1 += 1;
 }

 /// `(completed, skipped)` for `kind`.
 #[must_use]
 pub fn get(&self, kind: PipelineKind) -> (u64, u64) {
 self.inner.get(&kind).copied().unwrap_or_default()
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use std::collections::VecDeque;
 use std::sync::Mutex;

 enum Scripted {
 Msg(WorkerMessage),
 Exit(WorkerExit),
 }

 struct ScriptedProcess {
 script: VecDeque<Scripted>,
 }

 impl WorkerProcess for ScriptedProcess {
 fn send_fault_set(&mut self, _payload: &str) -> std::io::Result<()> {
 Ok(())
 }

 fn poll(&mut self, _timeout: Duration) -> PollOutcome {
 match self.script.pop_front() {
 Some(Scripted::Msg(m)) => PollOutcome::Message(m),
 Some(Scripted::Exit(e)) => PollOutcome::Exited(e),
 None => PollOutcome::Idle,
 }
 }

 fn terminate(&mut self) {
 self.script.clear();
 self.script.push_back(Scripted::Exit(WorkerExit::Abnormal));
 }
 }

 struct ScriptedSpawner {
 // One script per spawn call, in order.
 scripts: Mutex<VecDeque<VecDeque<Scripted>>>,
 }

 impl WorkerSpawner for ScriptedSpawner {
 fn spawn(
 &self,
 _worker_id: usize,
 _partitions: [Partition; 3],
 _fault_payload: &str,
 ) -> std::io::Result<Box<dyn WorkerProcess>> {
 let script = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
 Ok(Box::new(ScriptedProcess { script }))
 }
 }

 fn msg(kind: PipelineKind, index: u64, hash: Hash) -> Scripted {
 Scripted::Msg(WorkerMessage::Progress { kind, index, hash })
 }

 /// S5: a single worker crashes after compute index 50 of 200, respawns at 51, finishes; the
 /// crashing module ends up in the fault set and `dirty_process_deaths == 0` (because the
 /// crashed worker's own exit was `Controlled` with progress observed, i.e. a clean recovery,
 /// not an abandonment).
 #[test]
 fn crash_recovery_resumes_from_next_index() {
 let mut first_gen = VecDeque::new();
 for i in 0..=50u64 {
 first_gen.push_back(msg(PipelineKind::Compute, i, 1000 + i));
 }
 first_gen.push_back(Scripted::Msg(WorkerMessage::Module(0xdead_beef)));
 first_gen.push_back(Scripted::Msg(WorkerMessage::Crash));
 first_gen.push_back(Scripted::Exit(WorkerExit::Controlled));

 let mut second_gen = VecDeque::new();
 for i in 51..200u64 {
 second_gen.push_back(msg(PipelineKind::Compute, i, 1000 + i));
 }
 second_gen.push_back(Scripted::Exit(WorkerExit::Clean));

 let spawner = ScriptedSpawner {
 scripts: Mutex::new(VecDeque::from([first_gen, second_gen])),
 };
 let fault_set = Arc::new(FaultSet::new());
 let mut master = Master::start(
 Box::new(spawner),
 [0, 200, 0],
 1,
 fault_set,
 Duration::from_secs(30),
 Duration::from_secs(10),
 Duration::from_millis(1),
 )
.unwrap();

 let outcome = master.run_to_completion();

 assert!(outcome.faulty_modules.contains(&0xdead_beef));
 assert_eq!(outcome.kinds[1].completed_through, Some(199));
 assert_eq!(outcome.clean_process_deaths, 1);
 assert_eq!(outcome.exit_code(), 1, "one dirty death is expected from the crash itself");
 }

 #[test]
 fn worker_that_never_progresses_is_abandoned_without_respawn() {
 let mut script = VecDeque::new();
 script.push_back(Scripted::Exit(WorkerExit::Abnormal));
 let spawner = ScriptedSpawner {
 scripts: Mutex::new(VecDeque::from([script.clone()])),
 };
 let fault_set = Arc::new(FaultSet::new());
 let mut master = Master::start(
 Box::new(spawner),
 [10, 0, 0],
 1,
 fault_set,
 Duration::from_secs(30),
 Duration::from_secs(10),
 Duration::from_millis(1),
 )
.unwrap();

 let outcome = master.run_to_completion();
 assert_eq!(outcome.kinds[0].completed_through, None);
 assert_eq!(outcome.dirty_process_deaths, 1);
 assert_eq!(outcome.exit_code(), 1);
 let _ = script.pop_front();
 }
}
