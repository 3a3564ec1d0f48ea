// SPDX-License-Identifier: Apache-2.0
//! Fossilize: capture and replay of graphics-API pipeline-state objects.
//!
//! This crate is a façade, not a new layer of logic — it re-exports each component crate's
//! public surface under one name so an embedder depends on `fossilize` instead of nine crates
//! individually, the way `echo-app-core` gathers Echo's application services. The components
//! themselves, and the order data flows through them, are:
//!
//! 1. [`recorder`] (C2) interns a capture layer's create-info graph, handle by handle, into
//! [`model::NormalizedObject`]s addressed by [`model::Hash`] — [`hash`] (C1) is what computes
//! that address.
//! 2. [`codec`] (C3) turns a normalized object into the self-describing bytes [`db`] (C4) stores,
//! content-addressed, in an append-only archive.
//! 3. [`worker`] (C5) is the inline-or-background path from "just interned" to "durably on disk".
//! 4. [`replay`] (C6) walks an archive back out in dependency order against an embedder-supplied
//! [`replay::StateCreatorInterface`].
//! 5. [`orchestrator`] (C7) does the same walk across crash-tolerant worker subprocesses, and
//! [`client`] (C8) is what an embedder links against to drive that orchestration without
//! depending on its internals.
//!
//! [`config`] is ambient: every tunable the other eight components expose a default for
//! ([`config::FossilizeConfig`]) can be overridden through it.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]

mod error;

pub use error::FossilizeError;

/// The normalized pipeline-state data model.
pub mod model {
 pub use fossilize_model::*;
}

/// The fingerprint engine.
pub mod hash {
 pub use fossilize_hash::*;
}

/// The self-describing binary encoder/decoder.
pub mod codec {
 pub use fossilize_codec::*;
}

/// The normalized object store: `Recorder`, handles, and capture-layer input shapes (C2;
/// spec.md §4.2).
pub mod recorder {
 pub use fossilize_recorder::*;
}

/// The content-addressed archive database.
pub mod db {
 pub use fossilize_db::*;
}

/// The recording worker, inline or backgrounded.
pub mod worker {
 pub use fossilize_worker::*;
}

/// The replayer and its `StateCreatorInterface`.
pub mod replay {
 pub use fossilize_replay::*;
}

/// The crash-tolerant master/worker orchestrator.
pub mod orchestrator {
 pub use fossilize_orchestrator::*;
}

/// The external-replayer client façade.
pub mod client {
 pub use fossilize_client::*;
}

/// Configuration for every tunable the above expose a default for.
pub mod config {
 pub use fossilize_config::*;
}
