// SPDX-License-Identifier: Apache-2.0
//! The master's accumulated set of shader-module hashes known to crash the driver.
//!
//! The set only ever grows for the lifetime of one orchestration: a module is never un-banned
//! once attributed to a crash.

use fossilize_model::Hash;
use std::collections::HashSet;
use std::sync::Mutex;

/// Thread-safe, monotonically-growing set of banned module hashes.
#[derive(Debug, Default)]
pub struct FaultSet {
 modules: Mutex<HashSet<Hash>>,
}

impl FaultSet {
 /// An empty fault set, as a fresh orchestration starts with.
 #[must_use]
 pub fn new() -> Self {
 Self::default()
 }

 /// Adds `hash` to the set. Returns `true` if this is the first time `hash` has been banned.
 pub fn insert(&self, hash: Hash) -> bool {
 self.modules.lock().unwrap_or_else(std::sync::PoisonError::into_inner).insert(hash)
 }

 /// `true` if `hash` has been attributed to a crash.
 #[must_use]
 pub fn contains(&self, hash: Hash) -> bool {
 self.modules
.lock()
.unwrap_or_else(std::sync::PoisonError::into_inner)
.contains(&hash)
 }

 /// A snapshot of every banned hash, in no particular order.
 #[must_use]
 pub fn snapshot(&self) -> Vec<Hash> {
 self.modules
.lock()
.unwrap_or_else(std::sync::PoisonError::into_inner)
.iter()
.copied()
.collect()
 }

 /// Serializes the set as the newline-delimited, blank-line-terminated hex list a worker
 /// reads on stdin at startup.
 #[must_use]
 pub fn to_startup_payload(&self) -> String {
 let mut payload = String::new();
 for hash in self.snapshot() {
 payload.push_str(&fossilize_model::format_hash(hash));
 payload.push('\n');
 }
 payload.push('\n');
 payload
 }

 /// Parses the startup payload a worker reads from its input pipe back into a [`FaultSet`].
 #[must_use]
 pub fn from_startup_payload(payload: &str) -> Self {
 let set = Self::new();
 for line in payload.lines() {
 if line.is_empty() {
 break;
 }
 if let Ok(hash) = fossilize_model::parse_hash(line) {
 set.insert(hash);
 }
 }
 set
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn insert_reports_first_occurrence_only() {
 let set = FaultSet::new();
 assert!(set.insert(1));
 assert!(!set.insert(1));
 assert!(set.contains(1));
 assert!(!set.contains(2));
 }

 #[test]
 fn startup_payload_round_trips() {
 let set = FaultSet::new();
 set.insert(0xdead_beef);
 set.insert(0xcafe_babe);

 let payload = set.to_startup_payload();
 assert!(payload.ends_with("\n\n"));

 let restored = FaultSet::from_startup_payload(&payload);
 assert!(restored.contains(0xdead_beef));
 assert!(restored.contains(0xcafe_babe));
 assert_eq!(restored.snapshot().len(), 2);
 }

 #[test]
 fn empty_set_payload_is_a_single_blank_line() {
 let set = FaultSet::new();
 assert_eq!(set.to_startup_payload(), "\n");
 assert!(FaultSet::from_startup_payload("\n").snapshot().is_empty());
 }
}
