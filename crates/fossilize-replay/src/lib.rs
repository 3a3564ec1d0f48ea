// SPDX-License-Identifier: Apache-2.0
//! The replayer / state-creator interface (C6): walks an archive in dependency order and hands
//! decoded create-infos to a pluggable [`StateCreatorInterface`].
//!
//! This crate does not talk to a driver itself — it decodes what [`fossilize_db::Archive`]
//! stored, via [`fossilize_codec`], and dispatches to whatever embedder-supplied creator
//! [`Replayer::replay`] is given. [`fossilize_orchestrator`](../fossilize_orchestrator/index.html)
//! is the crate that drives this across crash-tolerant worker subprocesses; this one only knows
//! how to walk a single archive once, in the fixed tag order
//! [`fossilize_model::PLAYBACK_ORDER`] defines.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]

mod creator;
mod error;
mod replay;

pub use creator::{CreateOutcome, CreatorError, StateCreatorInterface};
pub use error::ReplayError;
pub use replay::{ReplayStats, Replayer};
