// SPDX-License-Identifier: Apache-2.0
//! Splitting one pipeline kind's index space evenly across N workers.
//!
//! Graphics, compute, and raytracing partitions are computed independently — each pipeline kind
//! gets its own even split over the same worker count.

use std::ops::Range;

/// One worker's assigned, half-open index range into a single pipeline kind's hash list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
 /// First index (inclusive) this worker owns.
 pub start: usize,
 /// Last index (exclusive) this worker owns.
 pub end: usize,
}

impl Partition {
 /// Number of indices in this partition.
 #[must_use]
 pub const fn len(&self) -> usize {
 self.end - self.start
 }

 /// `true` if this partition owns no indices.
 #[must_use]
 pub const fn is_empty(&self) -> bool {
 self.start >= self.end
 }

 /// This partition's range as a `Range<usize>`, for slice indexing.
 #[must_use]
 pub fn as_range(&self) -> Range<usize> {
 self.start.self.end
 }
}

/// Splits `total` indices as evenly as possible across `worker_count` workers.
///
/// The first `total % worker_count` workers get one extra index, matching the original's
/// straightforward `ceil`-based split. `worker_count == 0` or `total == 0` yields all-empty
/// partitions rather than panicking — an archive with zero pipelines of some kind is legal.
#[must_use]
pub fn partition_evenly(total: usize, worker_count: usize) -> Vec<Partition> {
 if worker_count == 0 {
 return Vec::new();
 }
 if total == 0 {
 return vec![Partition { start: 0, end: 0 }; worker_count];
 }

 let base = total / worker_count;
 let remainder = total % worker_count;
 let mut partitions = Vec::with_capacity(worker_count);
 let mut cursor = 0;
 for i in 0..worker_count {
 let size = base + usize::from(i < remainder);
 let start = cursor;
 let end = (cursor + size).min(total);
 partitions.push(Partition { start, end });
 cursor = end;
 }
 partitions
}

/// Computes a respawned worker's resume-from start index, per spec.md §4.7: `max(recorded
/// progress, previous start) + 1`. `recorded_progress` is `None` if this worker never reported
/// any progress before crashing.
#[must_use]
pub fn resume_start(recorded_progress: Option<usize>, previous_start: usize) -> usize {
 match recorded_progress {
 Some(progress) => progress.max(previous_start) + 1,
 None => previous_start,
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn splits_evenly_when_divisible() {
 let partitions = partition_evenly(200, 4);
 assert_eq!(partitions.len(), 4);
 for p in &partitions {
 assert_eq!(p.len(), 50);
 }
 assert_eq!(partitions[0].start, 0);
 assert_eq!(partitions[3].end, 200);
 }

 #[test]
 fn distributes_remainder_to_earliest_workers() {
 let partitions = partition_evenly(10, 3);
 let lens: Vec<usize> = partitions.iter().map(Partition::len).collect();
 assert_eq!(lens, vec![4, 3, 3]);
 assert_eq!(partitions.last().unwrap().end, 10);
 }

 #[test]
 fn zero_total_yields_empty_partitions() {
 let partitions = partition_evenly(0, 3);
 assert_eq!(partitions.len(), 3);
 assert!(partitions.iter().all(Partition::is_empty));
 }

 #[test]
 fn zero_workers_yields_no_partitions() {
 assert!(partition_evenly(100, 0).is_empty());
 }

 #[test]
 fn resume_start_matches_spec_formula() {
 assert_eq!(resume_start(Some(50), 0), 51);
 assert_eq!(resume_start(Some(50), 60), 61);
 assert_eq!(resume_start(None, 60), 60);
 }
}
