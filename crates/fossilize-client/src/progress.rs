// SPDX-License-Identifier: Apache-2.0
//! A point-in-time snapshot of a [`crate::ReplayClient`]'s [`SharedControlBlock`], and the
//! condensed single-number progress an embedder shows a user.
//!
//! [`SharedControlBlock`]: fossilize_orchestrator::SharedControlBlock

use fossilize_orchestrator::ControlBlockHeader;

/// What a call to [`crate::ReplayClient::poll_progress`] reports, independent of the counters
/// it read alongside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollStatus {
 /// No worker has reported progress yet.
 ResultNotReady,
 /// At least one worker has started, and not every worker has reached a terminal state.
 Running,
 /// Every worker has reached a terminal state.
 Complete,
 /// The background thread driving the orchestrator ended abnormally (panicked) before
 /// marking progress complete.
 Error,
}

/// One pipeline kind's counters, copied out of the [`ControlBlockHeader`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindProgress {
 /// Pipelines successfully built.
 pub successes: u32,
 /// Pipelines the creator reported as skipped.
 pub skips: u32,
 /// Pipelines served from a cache rather than freshly compiled.
 pub caches: u32,
 /// Archive entries that failed to parse.
 pub parses: u32,
 /// Pipelines that failed outright.
 pub failures: u32,
 /// Total pipelines of this kind in the archive.
 pub total: u32,
}

/// Shader-module counters, copied out of the [`ControlBlockHeader`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModuleProgress {
 /// Total shader modules in the archive.
 pub total: u32,
 /// Modules successfully created.
 pub completed: u32,
 /// Modules masked because they previously crashed the driver.
 pub banned: u32,
 /// Modules the validation layer rejected.
 pub validation_failed: u32,
}

/// A snapshot of every counter an embedder might want to render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
 /// Graphics pipeline counters.
 pub graphics: KindProgress,
 /// Compute pipeline counters.
 pub compute: KindProgress,
 /// Ray tracing pipeline counters.
 pub raytracing: KindProgress,
 /// Shader module counters.
 pub modules: ModuleProgress,
 /// Clean (`exit 0`) worker process terminations observed so far.
 pub clean_process_deaths: u32,
 /// Dirty (crash/timeout/abnormal-exit) worker process terminations observed so far.
 pub dirty_process_deaths: u32,
}

fn kind_progress(counters: &fossilize_orchestrator::control_block::PipelineKindCounters) -> KindProgress {
 use std::sync::atomic::Ordering::Relaxed;
 KindProgress {
 successes: counters.successes.load(Relaxed),
 skips: counters.skips.load(Relaxed),
 caches: counters.caches.load(Relaxed),
 parses: counters.parses.load(Relaxed),
 failures: counters.failures.load(Relaxed),
 total: counters.total.load(Relaxed),
 }
}

impl Progress {
 /// Reads a snapshot out of a live [`ControlBlockHeader`].
 #[must_use]
 pub fn from_header(header: &ControlBlockHeader) -> Self {
 use std::sync::atomic::Ordering::Relaxed;
 Self {
 graphics: kind_progress(&header.pipelines[0]),
 compute: kind_progress(&header.pipelines[1]),
 raytracing: kind_progress(&header.pipelines[2]),
 modules: ModuleProgress {
 total: header.modules.total.load(Relaxed),
 completed: header.modules.completed.load(Relaxed),
 banned: header.modules.banned.load(Relaxed),
 validation_failed: header.modules.validation_failed.load(Relaxed),
 },
 clean_process_deaths: header.clean_process_deaths.load(Relaxed),
 dirty_process_deaths: header.dirty_process_deaths.load(Relaxed),
 }
 }
}

/// Folds every counter in `progress` into a single `(completed, total)` pair that only ever
/// moves forward : pipeline successes count at full weight, module completions
/// count at ×1/10 weight (modules compile much faster than pipelines and stream in far more of
/// them), and skipped/cached pipelines count at ×1/100 weight (free outcomes that would
/// otherwise make progress look like it jumped ahead when a replay is mostly cache hits).
///
/// Both numbers are scaled ×100 to stay in integer arithmetic (the ×1/10 and ×1/100 weights
/// share a 100 denominator); an embedder that wants a fraction divides one by the other directly,
/// the common scale factor cancels.
#[must_use]
pub fn compute_condensed_progress(progress: &Progress) -> (u64, u64) {
 let kinds = [progress.graphics, progress.compute, progress.raytracing];

 let mut completed: u64 = 0;
 let mut total: u64 = 0;
 for kind in kinds {
 completed += u64::from(kind.successes) * 100;
 completed += u64::from(kind.skips + kind.caches);
 total += u64::from(kind.total) * 100;
 }
 completed += u64::from(progress.modules.completed) * 10;
 total += u64::from(progress.modules.total) * 10;

 (completed, total)
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn condensed_progress_reaches_total_when_everything_succeeds() {
 let progress = Progress {
 graphics: KindProgress { successes: 10, total: 10,.Default::default() },
 compute: KindProgress { successes: 5, total: 5,.Default::default() },
 raytracing: KindProgress::default(),
 modules: ModuleProgress { completed: 20, total: 20,.Default::default() },
 clean_process_deaths: 0,
 dirty_process_deaths: 0,
 };
 let (completed, total) = compute_condensed_progress(&progress);
 assert_eq!(completed, total);
 }

 #[test]
 fn skips_and_caches_count_for_far_less_than_a_real_success() {
 let all_skipped = Progress {
 graphics: KindProgress { skips: 100, total: 100,.Default::default() },
.Default::default()
 };
 let all_built = Progress {
 graphics: KindProgress { successes: 100, total: 100,.Default::default() },
.Default::default()
 };
 let (skipped_completed, _) = compute_condensed_progress(&all_skipped);
 let (built_completed, _) = compute_condensed_progress(&all_built);
 assert!(skipped_completed < built_completed);
 }

 #[test]
 fn total_never_shrinks_as_modules_stream_in_relative_to_pipelines() {
 let mostly_modules = Progress {
 graphics: KindProgress { total: 1,.Default::default() },
 modules: ModuleProgress { total: 1000, completed: 1000,.Default::default() },
.Default::default()
 };
 let (completed, total) = compute_condensed_progress(&mostly_modules);
 // Modules are weighted down 10x relative to pipelines, so 1000 completed modules don't
 // dwarf a single pipeline's weight the way a naive unweighted sum would.
 assert_eq!(total, 1 * 100 + 1000 * 10);
 assert_eq!(completed, 1000 * 10);
 }
}
