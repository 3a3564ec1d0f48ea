// SPDX-License-Identifier: Apache-2.0
//! Filesystem-backed [`ConfigStore`], rooted at the platform config directory via `directories`
//! — the same approach as the teacher's `echo-config-fs`.

use crate::port::{ConfigError, ConfigStore};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/// Stores each config key as its own JSON file under a platform-appropriate config directory.
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Resolves the platform config directory for Fossilize and creates it if absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Other`] if the platform config directory cannot be resolved (no
    /// `HOME`-equivalent on this platform), or [`ConfigError::Io`] if it cannot be created.
    pub fn new() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("dev", "fossilize", "Fossilize")
            .ok_or_else(|| ConfigError::Other("could not resolve config directory".to_owned()))?;
        let base = proj.config_dir().to_path_buf();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// Opens a store rooted at an explicit directory, for tests and embedders that manage their
    /// own config location.
    pub fn at(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_a_temp_directory() {
        let dir = std::env::temp_dir().join(format!("fossilize-config-test-{:p}", &0));
        let store = FsConfigStore::at(dir.clone()).unwrap();
        store.save_raw("k", b"hello").unwrap();
        assert_eq!(store.load_raw("k").unwrap(), b"hello");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_key_is_not_found() {
        let dir = std::env::temp_dir().join(format!("fossilize-config-test-missing-{:p}", &0));
        let store = FsConfigStore::at(dir.clone()).unwrap();
        assert!(matches!(store.load_raw("nope"), Err(ConfigError::NotFound)));
        let _ = fs::remove_dir_all(dir);
    }
}
