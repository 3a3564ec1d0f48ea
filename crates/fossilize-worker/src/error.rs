// SPDX-License-Identifier: Apache-2.0
//! Error type for the recording worker.

/// Everything that can go wrong submitting to or draining the recording worker.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The worker's archive failed to encode or persist an object.
    #[error("archive write failed")]
    Db(#[from] fossilize_db::DbError),

    /// A submission was attempted after the worker's queue was closed (it has already been
    /// asked to shut down, or its task has already exited).
    #[error("recording worker is no longer accepting objects")]
    Closed,

    /// [`crate::RecordingWorker::shutdown`] was called but the worker's task panicked or was
    /// otherwise aborted rather than exiting normally.
    #[error("recording worker task did not exit cleanly")]
    TaskFailed,
}
