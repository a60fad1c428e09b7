// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The read-side aggregator: opens every JSONL shard under a root and
//! k-way merges them by timestamp (spec §4.5, §9 re-architecture note on
//! "read-side log merge").

use crate::error::EventLogError;
use crate::record::EventRecord;
use std::fs;
use std::path::Path;

/// Read and merge every shard under `root` (the orchestrator shard plus
/// every file in `root/workers/`), returning records in non-decreasing
/// timestamp order.
///
/// Diagnostic, not authoritative (spec §4.5): a line that fails to parse
/// is treated as an in-progress write (the writer appends a full line at a
/// time, but a reader can observe a torn write if it reads mid-`write_all`)
/// and is skipped rather than surfaced as an error, so the aggregator
/// tolerates writers appending live.
pub fn read_all(root: &Path) -> Result<Vec<EventRecord>, EventLogError> {
    let mut shard_paths = Vec::new();

    let orchestrator_shard = root.join("orchestrator.jsonl");
    if orchestrator_shard.is_file() {
        shard_paths.push(orchestrator_shard);
    }

    let workers_dir = root.join("workers");
    if workers_dir.is_dir() {
        let entries = fs::read_dir(&workers_dir)
            .map_err(|source| EventLogError::Io { path: workers_dir.display().to_string(), source })?;
        for entry in entries {
            let entry = entry
                .map_err(|source| EventLogError::Io { path: workers_dir.display().to_string(), source })?;
            if entry.path().extension().and_then(|e| e.to_str()) == Some("jsonl") {
                shard_paths.push(entry.path());
            }
        }
    }

    let mut records = Vec::new();
    for path in &shard_paths {
        records.extend(read_shard(path)?);
    }
    records.sort_by_key(|r| r.timestamp);
    Ok(records)
}

/// Only events at or after `since`, still in timestamp order. Used by
/// status subscribers polling the tail of the log rather than re-reading
/// everything.
pub fn read_since(
    root: &Path,
    since: chrono::DateTime<chrono::Utc>,
) -> Result<Vec<EventRecord>, EventLogError> {
    Ok(read_all(root)?.into_iter().filter(|r| r.timestamp >= since).collect())
}

fn read_shard(path: &Path) -> Result<Vec<EventRecord>, EventLogError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| EventLogError::Io { path: path.display().to_string(), source })?;
    let mut records = Vec::new();
    let lines: Vec<&str> = contents.lines().collect();
    let last_index = lines.len().saturating_sub(1);
    for (i, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<EventRecord>(line) {
            Ok(record) => records.push(record),
            Err(err) if i == last_index => {
                tracing::debug!(path = %path.display(), %err, "ignoring possibly in-flight trailing event log line");
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "skipping unparseable event log line");
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
