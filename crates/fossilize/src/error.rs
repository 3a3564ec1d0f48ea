// SPDX-License-Identifier: Apache-2.0
//! A single error type spanning every sub-crate's own seam, for embedders that would rather
//! match on one enum than thread eight.
//!
//! Nothing here replaces a sub-crate's own error type — `fossilize_recorder::RecorderError` and
//! friends are still the precise type each crate's API returns. This exists only for the
//! common case of a caller driving the whole pipeline (record, encode, persist, replay) who
//! wants `?` to keep working across every one of those calls.

/// Everything any Fossilize sub-crate can report, collected behind one `?`-friendly enum.
#[derive(Debug, thiserror::Error)]
pub enum FossilizeError {
 /// Interning a create-info failed.
 #[error(transparent)]
 Recorder(#[from] fossilize_recorder::RecorderError),

 /// Encoding or decoding a blob failed.
 #[error(transparent)]
 Codec(#[from] fossilize_codec::CodecError),

 /// An archive failed to open, read, or write.
 #[error(transparent)]
 Db(#[from] fossilize_db::DbError),

 /// The recording worker failed to accept or persist an object.
 #[error(transparent)]
 Worker(#[from] fossilize_worker::WorkerError),

 /// Replaying an archive against a state creator failed.
 #[error(transparent)]
 Replay(#[from] fossilize_replay::ReplayError),

 /// Standing up or driving a master/worker orchestration failed.
 #[error(transparent)]
 Orchestrator(#[from] fossilize_orchestrator::OrchestratorError),

 /// The external-replayer client failed to launch or observe an orchestration.
 #[error(transparent)]
 Client(#[from] fossilize_client::ClientError),

 /// A configuration value failed to load or save.
 #[error(transparent)]
 Config(#[from] fossilize_config::ConfigError),
}
