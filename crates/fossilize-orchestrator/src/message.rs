// SPDX-License-Identifier: Apache-2.0
//! Line-oriented worker-to-master IPC messages.
//!
//! Every message is at most 64 bytes including the trailing newline. A worker writes these to
//! its stdout pipe; the master reads them line by line and feeds them into its per-worker
//! [`crate::state::WorkerState`] machine.

use fossilize_model::Hash;
use std::fmt;

/// The maximum encoded length of one message, trailing newline included.
pub const MAX_MESSAGE_LEN: usize = 64;

/// One pipeline kind, as distinguished by the `GRAPHICS`/`COMPUTE`/`RAYTRACE` message family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineKind {
 /// `VkPipeline` built from a graphics pipeline create-info.
 Graphics,
 /// `VkPipeline` built from a compute pipeline create-info.
 Compute,
 /// `VkPipeline` built from a ray tracing pipeline create-info.
 Raytrace,
}

impl fmt::Display for PipelineKind {
 fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
 let name = match self {
 PipelineKind::Graphics => "GRAPHICS",
 PipelineKind::Compute => "COMPUTE",
 PipelineKind::Raytrace => "RAYTRACE",
 };
 f.write_str(name)
 }
}

/// A parsed message from a worker subprocess, per the table in spec.md §4.7.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkerMessage {
 /// Worker caught a fatal signal; the master should arm its crash timer.
 Crash,
 /// Worker completed pipeline `index` of `kind`, which hashes to `hash`. Used as a resume
 /// point on respawn.
 Progress {
 /// Which pipeline family completed.
 kind: PipelineKind,
 /// The pipeline's index within its partition.
 index: u64,
 /// The pipeline's fingerprint.
 hash: Hash,
 },
 /// Module `hash` contributed to the crash currently being attributed.
 Module(Hash),
 /// The validation layer rejected pipeline `hash` of `kind`; not a crash.
 ValidationFailed {
 /// Which pipeline family was rejected.
 kind: PipelineKind,
 /// The rejected pipeline's fingerprint.
 hash: Hash,
 },
 /// The worker's shader-module-identifier algorithm UUID, hex-encoded.
 ModuleUuid(String),
 /// A liveness tick, carrying no other information.
 Heartbeat,
}

/// A line failed to parse as any known [`WorkerMessage`] variant.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized orchestrator IPC message: {0:?}")]
pub struct ParseMessageError(pub String);

impl WorkerMessage {
 /// Formats this message the way a worker writes it to its stdout pipe: one line, terminated
 /// by `\n`, at most [`MAX_MESSAGE_LEN`] bytes.
 #[must_use]
 pub fn encode(&self) -> String {
 match self {
 WorkerMessage::Crash => "CRASH\n".to_owned(),
 WorkerMessage::Progress { kind, index, hash } => {
 format!("{kind} {index} {hash:016x}\n")
 }
 WorkerMessage::Module(hash) => format!("MODULE {hash:016x}\n"),
 WorkerMessage::ValidationFailed { kind, hash } => {
 format!("{kind}_VERR {hash:016x}\n")
 }
 WorkerMessage::ModuleUuid(hex) => format!("MODULE_UUID {hex}\n"),
 WorkerMessage::Heartbeat => "HEARTBEAT\n".to_owned(),
 }
 }

 /// Parses one line (without its trailing newline) as a [`WorkerMessage`].
 ///
 /// # Errors
 ///
 /// Returns [`ParseMessageError`] if the line doesn't match any known message shape. An
 /// unrecognized line is never silently ignored by the caller — the master logs and counts
 /// it as a protocol error but keeps the worker running.
 pub fn parse(line: &str) -> Result<Self, ParseMessageError> {
 let line = line.trim_end_matches(['\r', '\n']);
 let mut parts = line.split_whitespace();
 let head = parts.next().ok_or_else(|| ParseMessageError(line.to_owned()))?;

 let fail = || ParseMessageError(line.to_owned());
 match head {
 "CRASH" => Ok(WorkerMessage::Crash),
 "HEARTBEAT" => Ok(WorkerMessage::Heartbeat),
 "GRAPHICS" | "COMPUTE" | "RAYTRACE" => {
 let kind = match head {
 "GRAPHICS" => PipelineKind::Graphics,
 "COMPUTE" => PipelineKind::Compute,
 _ => PipelineKind::Raytrace,
 };
 let index: u64 = parts.next().ok_or_else(fail)?.parse().map_err(|_| fail())?;
 let hash = Hash::from_str_radix(parts.next().ok_or_else(fail)?, 16).map_err(|_| fail())?;
 Ok(WorkerMessage::Progress { kind, index, hash })
 }
 "GRAPHICS_VERR" | "COMPUTE_VERR" | "RAYTRACE_VERR" => {
 let kind = match head {
 "GRAPHICS_VERR" => PipelineKind::Graphics,
 "COMPUTE_VERR" => PipelineKind::Compute,
 _ => PipelineKind::Raytrace,
 };
 let hash = Hash::from_str_radix(parts.next().ok_or_else(fail)?, 16).map_err(|_| fail())?;
 Ok(WorkerMessage::ValidationFailed { kind, hash })
 }
 "MODULE" => {
 let hash = Hash::from_str_radix(parts.next().ok_or_else(fail)?, 16).map_err(|_| fail())?;
 Ok(WorkerMessage::Module(hash))
 }
 "MODULE_UUID" => {
 let hex = parts.next().ok_or_else(fail)?;
 Ok(WorkerMessage::ModuleUuid(hex.to_owned()))
 }
 _ => Err(fail()),
 }
 }
}
