// SPDX-License-Identifier: Apache-2.0
//! Error type for replay.

use fossilize_model::{Hash, ResourceTag};

/// Everything that can go wrong walking an archive and handing its contents to a state creator.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// The archive itself failed to read.
    #[error("archive read failed")]
    Db(#[from] fossilize_db::DbError),

    /// A record's payload failed to decode.
    #[error("failed to decode blob {tag} {hash:016x}")]
    Codec {
        /// Resource tag of the record that failed to decode.
        tag: ResourceTag,
        /// Hash of the record that failed to decode.
        hash: Hash,
        /// Underlying codec error.
        #[source]
        source: fossilize_codec::CodecError,
    },

    /// `get_hash_list_for_resource_tag` named a hash that has no archive entry.
    #[error("{tag} {hash:016x} is listed but has no archive entry")]
    MissingEntry {
        /// Resource tag of the missing record.
        tag: ResourceTag,
        /// Hash of the missing record.
        hash: Hash,
    },

    /// An object's dependency hasn't been created yet, which should be impossible given the
    /// fixed playback order unless the archive itself is inconsistent.
    #[error("{tag} {hash:016x} depends on {dependency:016x}, which was not created first")]
    Dependency {
        /// Resource tag of the object with the missing dependency.
        tag: ResourceTag,
        /// Hash of the object with the missing dependency.
        hash: Hash,
        /// Hash of the dependency that wasn't found.
        dependency: Hash,
    },

    /// The state creator returned an error for a specific object.
    #[error("state creator rejected {tag} {hash:016x}")]
    Creator {
        /// Resource tag of the rejected object.
        tag: ResourceTag,
        /// Hash of the rejected object.
        hash: Hash,
        /// The creator's own error, boxed to avoid constraining it to any particular type.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A worker thread used for concurrent pipeline dispatch panicked.
    #[error("a replay worker thread panicked")]
    ThreadPanicked,
}
