// SPDX-License-Identifier: Apache-2.0
//! Client-facing error type: everything that can go wrong launching or waiting on an
//! orchestration from the embedder side.

/// Everything [`crate::ReplayClient`] can report.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
 /// The archive the client was asked to replay failed to open or scan.
 #[error("archive failed to open")]
 Db(#[from] fossilize_db::DbError),

 /// Spawning the orchestration's first generation of workers failed at the OS level.
 #[error("failed to launch orchestrator")]
 Io(#[from] std::io::Error),

 /// The background thread driving the orchestrator panicked before it could finish.
 #[error("orchestrator thread panicked before completing")]
 OrchestratorPanicked,

 /// [`crate::ReplayClient::wait`] or [`crate::ReplayClient::kill`] was called a second time
 /// after the orchestration had already been joined.
 #[error("orchestrator has already been joined")]
 AlreadyJoined,
}
