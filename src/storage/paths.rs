// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the local storage layout.

use std::path::{Path, PathBuf};

/// Default base directory, relative to the working directory.
pub const DATA_ROOT: &str = ".wallet-session";

/// File holding the cached provider preference.
pub const PREFERENCE_FILE: &str = "cached-provider.json";

/// Storage path utilities.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all stored data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the cached provider preference.
    pub fn preference_file(&self) -> PathBuf {
        self.root.join(PREFERENCE_FILE)
    }
}
