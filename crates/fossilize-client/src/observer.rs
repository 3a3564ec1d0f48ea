// SPDX-License-Identifier: Apache-2.0
//! Fans a [`crate::ReplayClient`]'s [`Master`](fossilize_orchestrator::Master) narration out to
//! both the [`SharedControlBlock`] an embedder polls and a per-kind validation-failure log the
//! control block's counters alone can't carry (a count, not the failing hashes).

use std::sync::{Arc, Mutex};

use fossilize_model::Hash;
use fossilize_orchestrator::{pipeline_kind_index, MasterObserver, PipelineKind, SharedControlBlock};

pub(crate) struct ClientObserver {
    pub(crate) control_block: Arc<SharedControlBlock<Box<[u8]>>>,
    pub(crate) validation_failed: Arc<Mutex<[Vec<Hash>; 3]>>,
}

impl MasterObserver for ClientObserver {
    fn on_progress(&self, kind: PipelineKind) {
        self.control_block.on_progress(kind);
    }

    fn on_validation_failed(&self, kind: PipelineKind, hash: Hash) {
        self.control_block.on_validation_failed(kind, hash);
        self.validation_failed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)[pipeline_kind_index(kind)]
            .push(hash);
    }

    fn on_module_banned(&self) {
        self.control_block.on_module_banned();
    }

    fn on_clean_death(&self) {
        self.control_block.on_clean_death();
    }

    fn on_dirty_death(&self) {
        self.control_block.on_dirty_death();
    }

    fn on_progress_started(&self) {
        self.control_block.on_progress_started();
    }

    fn on_progress_complete(&self) {
        self.control_block.on_progress_complete();
    }
}
