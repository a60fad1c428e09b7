// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-worker / per-orchestrator JSONL shard writers.

use crate::error::EventLogError;
use crate::record::{EventOrigin, EventRecord};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends [`EventRecord`]s to one JSONL shard. Every write is flushed
/// immediately: the log's contract is "arrives at or before the state
/// flush" (spec §4.5), so buffering across calls would violate it.
pub struct EventLogWriter {
    path: PathBuf,
}

impl EventLogWriter {
    /// Open the shard for `origin` under `root`, creating the directory and
    /// an empty shard file if needed.
    pub fn open(root: &Path, origin: &EventOrigin) -> Result<Self, EventLogError> {
        let path = shard_path(root, origin);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| EventLogError::Io { path: parent.display().to_string(), source })?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| EventLogError::Io { path: path.display().to_string(), source })?;
        Ok(Self { path })
    }

    #[allow(clippy::expect_used)]
    pub fn append(&self, record: &EventRecord) -> Result<(), EventLogError> {
        let mut line = serde_json::to_string(record).expect("EventRecord always serializes");
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| EventLogError::Io { path: self.path.display().to_string(), source })?;
        file.write_all(line.as_bytes())
            .map_err(|source| EventLogError::Io { path: self.path.display().to_string(), source })?;
        file.flush()
            .map_err(|source| EventLogError::Io { path: self.path.display().to_string(), source })
    }
}

pub(crate) fn shard_path(root: &Path, origin: &EventOrigin) -> PathBuf {
    match origin {
        EventOrigin::Orchestrator => root.join("orchestrator.jsonl"),
        EventOrigin::Worker(id) => root.join("workers").join(format!("{id}.jsonl")),
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
