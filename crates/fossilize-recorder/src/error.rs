// SPDX-License-Identifier: Apache-2.0
//! Recorder-local error type.

use crate::handle::Handle;
use fossilize_model::ResourceTag;

/// Everything that can go wrong interning a create-info.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecorderError {
 /// `record_*` was called twice for the same `(tag, handle)` pair.
 #[error("{tag} handle {handle:?} was already recorded")]
 DuplicateHandle {
 /// The tag the handle was recorded under.
 tag: ResourceTag,
 /// The handle recorded twice.
 handle: Handle,
 },
 /// A create-info referenced a handle that has never been recorded under the expected tag.
 #[error("{tag} handle {handle:?} has not been recorded")]
 UnresolvedHandle {
 /// The tag the lookup was performed under.
 tag: ResourceTag,
 /// The handle that could not be resolved.
 handle: Handle,
 },
}
