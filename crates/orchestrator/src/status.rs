// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The status contract (spec §4.1 "Status contract", §8 property 9
//! "idempotent status"): a side-effect-free snapshot built purely from the
//! in-memory run record, never touching the state store.

use serde::Serialize;
use std::collections::BTreeMap;
use zerg_core::run::{RunEvent, RunRecord, RunState};
use zerg_core::task_exec::TaskStatus;
use zerg_core::worker::WorkerRecord;

/// Per-status task counts for one level.
pub type LevelCounts = BTreeMap<TaskStatus, u32>;

/// A worker record plus a derived liveness diagnostic: whether its last
/// heartbeat is older than the configured staleness horizon (spec §9
/// "heartbeat granularity"). Purely informational — the run itself only
/// reconciles worker liveness at resume (`decision::tasks_needing_recovery`),
/// never mid-run, so a `heartbeat_stale` worker here is not automatically
/// recovered; it is a signal for an operator watching `zerg status`.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerStatusView {
    #[serde(flatten)]
    pub record: WorkerRecord,
    pub heartbeat_stale: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub feature: String,
    pub state: RunState,
    pub current_level: u32,
    pub paused: bool,
    pub global_error: Option<String>,
    /// Keyed by level number, present only for levels included by the
    /// optional `level` filter.
    pub levels: BTreeMap<u32, LevelCounts>,
    pub workers: Vec<WorkerStatusView>,
    pub last_events: Vec<RunEvent>,
}

const DEFAULT_EVENT_TAIL: usize = 20;

/// Build a snapshot from `record`, restricted to `level` when given (spec
/// §4.1: "Optional `level` argument restricts to one level").
///
/// `task_levels` maps each task id to its graph level so the snapshot can
/// group execution records without needing the graph itself. `now_epoch_ms`
/// and `heartbeat_staleness_ms` are only used to derive each worker's
/// `heartbeat_stale` diagnostic.
pub fn snapshot(
    record: &RunRecord,
    task_levels: &std::collections::HashMap<String, u32>,
    level: Option<u32>,
    now_epoch_ms: u64,
    heartbeat_staleness_ms: u64,
) -> StatusSnapshot {
    let mut levels: BTreeMap<u32, LevelCounts> = BTreeMap::new();
    for (task_id, exec) in &record.tasks {
        let Some(&task_level) = task_levels.get(task_id) else { continue };
        if let Some(only) = level {
            if task_level != only {
                continue;
            }
        }
        *levels.entry(task_level).or_default().entry(exec.status).or_insert(0) += 1;
    }

    let workers = record
        .workers
        .values()
        .cloned()
        .map(|record| {
            let heartbeat_stale = record.is_stale(now_epoch_ms, heartbeat_staleness_ms);
            WorkerStatusView { record, heartbeat_stale }
        })
        .collect();

    StatusSnapshot {
        feature: record.feature.clone(),
        state: record.state,
        current_level: record.current_level,
        paused: record.paused,
        global_error: record.global_error.clone(),
        levels,
        workers,
        last_events: record.last_events(DEFAULT_EVENT_TAIL).to_vec(),
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
