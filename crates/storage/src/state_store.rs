// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Checkpointed State Store (spec §4.3): atomic save/load/list/exists
//! of a `RunRecord` keyed by feature name.

use crate::error::StorageError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use zerg_core::run::RunRecord;

/// One JSON document per feature under `root`. Atomic replace via
/// temp-file-in-the-same-directory + fsync + rename, in the style of the
/// teacher's `daemon::storage::snapshot::rotate_bak_path` backup rotation,
/// simplified to the single transient `.bak` the spec calls for rather than
/// the teacher's multi-generation rotation.
pub struct StateStore {
    root: PathBuf,
}

impl StateStore {
    /// Open (creating if necessary) a state store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|source| StorageError::Io { path: root.display().to_string(), source })?;
        Ok(Self { root })
    }

    fn record_path(&self, feature: &str) -> Result<PathBuf, StorageError> {
        if feature.is_empty()
            || feature.contains('/')
            || feature.contains('\\')
            || feature == "."
            || feature == ".."
        {
            return Err(StorageError::InvalidFeatureName(feature.to_string()));
        }
        Ok(self.root.join(format!("{feature}.json")))
    }

    fn bak_path(&self, feature: &str) -> PathBuf {
        self.root.join(format!("{feature}.json.bak"))
    }

    fn tmp_path(&self, feature: &str) -> PathBuf {
        self.root.join(format!(".{feature}.json.tmp"))
    }

    pub fn exists(&self, feature: &str) -> Result<bool, StorageError> {
        Ok(self.record_path(feature)?.is_file())
    }

    /// Load the record for `feature`, or `None` if it has never been saved.
    /// A record that fails to parse is a hard failure (spec §4.3: "corrupt
    /// records are reported as a hard failure; they are NOT silently
    /// recreated").
    pub fn load(&self, feature: &str) -> Result<Option<RunRecord>, StorageError> {
        let path = self.record_path(feature)?;
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Io { path: path.display().to_string(), source })
            }
        };
        let record = serde_json::from_str(&contents)
            .map_err(|source| StorageError::Corrupt { feature: feature.to_string(), source })?;
        Ok(Some(record))
    }

    /// Atomically replace the record for `feature`. Callers MUST NOT
    /// acknowledge the transition this record represents until this call
    /// returns `Ok` (spec §4.3 "flush-before-ack").
    #[allow(clippy::expect_used)]
    pub fn save(&self, feature: &str, record: &RunRecord) -> Result<(), StorageError> {
        let path = self.record_path(feature)?;
        let json = serde_json::to_vec_pretty(record).expect("RunRecord always serializes");

        if path.is_file() {
            let _ = fs::copy(&path, self.bak_path(feature));
        }

        let tmp = self.tmp_path(feature);
        write_atomic(&tmp, &json)
            .map_err(|source| StorageError::Io { path: tmp.display().to_string(), source })?;
        fs::rename(&tmp, &path)
            .map_err(|source| StorageError::Io { path: path.display().to_string(), source })?;

        tracing::info!(feature, path = %path.display(), "run record checkpointed");
        Ok(())
    }

    /// All feature names with a saved record, sorted.
    pub fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut features = Vec::new();
        let entries = fs::read_dir(&self.root)
            .map_err(|source| StorageError::Io { path: self.root.display().to_string(), source })?;
        for entry in entries {
            let entry = entry
                .map_err(|source| StorageError::Io { path: self.root.display().to_string(), source })?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') {
                continue;
            }
            if let Some(feature) = name.strip_suffix(".json") {
                features.push(feature.to_string());
            }
        }
        features.sort();
        Ok(features)
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(test)]
#[path = "state_store_tests.rs"]
mod tests;
