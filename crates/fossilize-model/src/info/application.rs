// SPDX-License-Identifier: Apache-2.0
//! Application metadata tags, carried in the archive but outside the normal object graph
//! (spec.md §4.4 / original_source supplement — `VkApplicationInfo` and the engine's own
//! "blob link" record tying a capture to the application build that produced it).

/// `VkApplicationInfo`, as recorded alongside a capture rather than as a dependency of any
/// pipeline object. There is at most one live instance per archive; re-recording overwrites it
/// via the usual idempotent per-tag-hash write path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplicationInfoInfo {
    /// `pApplicationName`.
    pub application_name: String,
    /// `applicationVersion`.
    pub application_version: u32,
    /// `pEngineName`.
    pub engine_name: String,
    /// `engineVersion`.
    pub engine_version: u32,
    /// `apiVersion`.
    pub api_version: u32,
}

impl ApplicationInfoInfo {
    /// An application info record with empty names and version 0 everywhere.
    #[must_use]
    pub fn new() -> Self {
        Self {
            application_name: String::new(),
            application_version: 0,
            engine_name: String::new(),
            engine_version: 0,
            api_version: 0,
        }
    }
}

impl Default for ApplicationInfoInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// Links an archive to an opaque application-defined blob (arbitrary bytes the application wants
/// carried alongside its captures — build id, shader cache generation tag, etc).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplicationBlobLinkInfo {
    /// Application-defined tag identifying the kind of blob this is.
    pub tag: u32,
    /// The opaque payload.
    pub data: Vec<u8>,
}
