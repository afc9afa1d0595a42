// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cached provider preference.
//!
//! Remembers which provider option the user picked last so the session can
//! be restored on the next start without asking again.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StoragePaths;

/// Error type for preference storage.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedPreference {
    provider: String,
    cached_at: DateTime<Utc>,
}

/// File-backed store for the cached provider preference.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Store at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under `paths`.
    pub fn from_paths(paths: &StoragePaths) -> Self {
        Self::new(paths.preference_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached provider id. A missing file means no preference.
    pub fn load(&self) -> Result<Option<String>, PreferenceError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let cached: CachedPreference = serde_json::from_slice(&raw)?;
        Ok(Some(cached.provider))
    }

    /// Persist `provider` as the cached choice.
    pub fn save(&self, provider: &str) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let cached = CachedPreference {
            provider: provider.to_string(),
            cached_at: Utc::now(),
        };

        // Write-then-rename so a crash never leaves a truncated file behind.
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&serde_json::to_vec_pretty(&cached)?)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Forget the cached choice. Clearing an absent preference succeeds.
    pub fn clear(&self) -> Result<(), PreferenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::from_paths(&StoragePaths::new(dir.path().join("nested")));

        assert_eq!(store.load().unwrap(), None);

        store.save("local").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("local"));

        store.save("rpc").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("rpc"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn clear_missing_file_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("cached-provider.json"));
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cached-provider.json");
        fs::write(&path, b"{ not json").unwrap();

        let store = PreferenceStore::new(&path);
        assert!(matches!(store.load(), Err(PreferenceError::Json(_))));
    }
}
