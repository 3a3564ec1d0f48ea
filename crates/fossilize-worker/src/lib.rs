// SPDX-License-Identifier: Apache-2.0
//! The recording worker (C5): turns a stream of [`fossilize_model::InternedObject`]s into
//! archive writes, either inline on the calling thread or on a dedicated background task with a
//! bounded queue.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]

mod error;
mod sync;
mod worker;

pub use error::WorkerError;
pub use sync::record_sync;
pub use worker::RecordingWorker;
