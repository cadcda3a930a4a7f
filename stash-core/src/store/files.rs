// Copyright 2026 Stash Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Flat-directory file store.
//!
//! All stored files live directly under a single storage root; there are no
//! subdirectories. The store tracks one process-lifetime counter: the number
//! of distinct filenames ever created. The counter is seeded from the
//! on-disk file count at open and is never persisted, so a restart
//! resynchronizes it with disk state.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::filename::{is_contained, is_single_segment};

/// Aggregate disk usage of the storage root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageUsage {
    /// Number of regular files currently in the root.
    pub files_current: u64,
    /// Sum of their sizes in bytes.
    pub total_bytes: u64,
}

/// Flat-directory file store with an in-memory upload counter.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    files_stored: u64,
}

impl FileStore {
    /// Opens a store rooted at `root`, creating the directory if missing.
    ///
    /// The upload counter starts at the number of regular files already
    /// present in the root.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        let mut store = Self {
            root,
            files_stored: 0,
        };
        store.files_stored = store.usage().await?.files_current;

        info!(
            root = %store.root.display(),
            files = store.files_stored,
            "File store opened"
        );
        Ok(store)
    }

    /// The storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of distinct filenames ever created: files present at open
    /// plus every upload since that wrote a new name.
    pub fn files_stored_total(&self) -> u64 {
        self.files_stored
    }

    /// Writes `data` to `<root>/<name>`, fully overwriting any existing
    /// file of that name.
    ///
    /// Returns true if the name did not exist before the write; the upload
    /// counter is bumped only then. Callers must serialize writes: the
    /// existence check and the increment form a critical section with
    /// respect to concurrent uploads of the same name.
    pub async fn put(&mut self, name: &str, data: &[u8]) -> Result<bool, StoreError> {
        let path = self.path_for(name)?;
        let created = !tokio::fs::try_exists(&path).await?;

        tokio::fs::write(&path, data).await?;

        if created {
            self.files_stored += 1;
        }
        debug!(name, size = data.len(), created, "Stored file");
        Ok(created)
    }

    /// Resolves `name` to the path of an existing stored file.
    ///
    /// Rejects multi-segment names, then verifies the file exists and that
    /// its canonical path is still a descendant of the storage root (a
    /// symlink inside the root could otherwise point outside it).
    pub async fn resolve_existing(&self, name: &str) -> Result<PathBuf, StoreError> {
        let path = self.path_for(name)?;

        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    name: name.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        if !meta.is_file() {
            return Err(StoreError::NotFound {
                name: name.to_string(),
            });
        }

        if !is_contained(&self.root, &path)? {
            return Err(StoreError::InvalidFilename {
                name: name.to_string(),
            });
        }
        Ok(path)
    }

    /// Names of the regular files directly inside the root, in filesystem
    /// enumeration order.
    pub async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    /// Scans the root and returns the current file count and total size.
    ///
    /// Always a fresh scan; nothing is cached.
    pub async fn usage(&self) -> Result<StorageUsage, StoreError> {
        let mut usage = StorageUsage {
            files_current: 0,
            total_bytes: 0,
        };
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let meta = entry.metadata().await?;
            if meta.is_file() {
                usage.files_current += 1;
                usage.total_bytes += meta.len();
            }
        }
        Ok(usage)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        if !is_single_segment(name) {
            return Err(StoreError::InvalidFilename {
                name: name.to_string(),
            });
        }
        Ok(self.root.join(name))
    }
}
