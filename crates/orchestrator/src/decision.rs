// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure decision logic for the level barrier (spec §4.1): which level is
//! current, which pending task to dispatch next, whether a level has
//! closed, and whether a failed task should be retried. No I/O; every
//! function here is a plain, synchronous query over a [`TaskGraph`] and the
//! run's [`TaskExecutionRecord`]s, kept separate from the async dispatch
//! loop in `engine` so it can be exhaustively unit tested.

use std::collections::HashMap;
use zerg_core::task::{Task, TaskId};
use zerg_core::task_exec::{TaskExecutionRecord, TaskStatus};
use zerg_graph::TaskGraph;

/// The lowest level with any task not yet in a terminal status, or `None`
/// if every task in the graph is terminal (spec §4.1 step 1).
pub fn current_level(graph: &TaskGraph, records: &HashMap<String, TaskExecutionRecord>) -> Option<u32> {
    graph.levels().iter().copied().find(|&level| !level_is_closed(graph, records, level))
}

/// Whether every task at `level` has reached a terminal status (spec §4.1
/// step 4).
pub fn level_is_closed(
    graph: &TaskGraph,
    records: &HashMap<String, TaskExecutionRecord>,
    level: u32,
) -> bool {
    graph.tasks_at_level(level).iter().all(|task| {
        records.get(task.id.as_str()).map(|r| r.status.is_terminal()).unwrap_or(false)
    })
}

/// Whether a closed level represents a permanent run failure: at least one
/// of its tasks is `Failed` with no retry budget remaining (spec §4.1 step
/// 5, §7).
pub fn level_has_permanent_failure(
    graph: &TaskGraph,
    records: &HashMap<String, TaskExecutionRecord>,
    level: u32,
    retry_budget: u32,
) -> bool {
    graph.tasks_at_level(level).iter().any(|task| {
        records
            .get(task.id.as_str())
            .map(|r| r.status == TaskStatus::Failed && !should_retry(r, retry_budget))
            .unwrap_or(false)
    })
}

/// Ordered, tie-broken list of tasks at `level` currently `Pending` (spec
/// §4.1 "tie-break among simultaneously-pending tasks"): critical-path
/// first, then longest estimate first, then stable by task identifier.
pub fn pending_dispatch_order<'a>(
    tasks_at_level: &[&'a Task],
    records: &HashMap<String, TaskExecutionRecord>,
) -> Vec<&'a Task> {
    let mut pending: Vec<&Task> = tasks_at_level
        .iter()
        .copied()
        .filter(|t| records.get(t.id.as_str()).map(|r| r.status == TaskStatus::Pending).unwrap_or(false))
        .collect();
    pending.sort_by(|a, b| {
        b.critical_path
            .cmp(&a.critical_path)
            .then(b.estimate_minutes.cmp(&a.estimate_minutes))
            .then(a.id.as_str().cmp(b.id.as_str()))
    });
    pending
}

/// Attempts consumed so far, including the original (non-retry) attempt
/// (spec §4.1 "up to a per-run budget (default 3 attempts including the
/// first)").
pub fn attempts_used(record: &TaskExecutionRecord) -> u32 {
    record.retry_count + 1
}

/// Whether a task currently `Failed` still has retry budget remaining.
pub fn should_retry(record: &TaskExecutionRecord, retry_budget: u32) -> bool {
    record.status == TaskStatus::Failed && attempts_used(record) < retry_budget
}

/// All task ids in `claimed`/`in_progress` at process start — candidates
/// for crash recovery. Spec §4.1 "Crash recovery" checks the owning
/// worker's liveness by "(a) process presence and (b) heartbeat recency";
/// this implementation's workers are spawned async tasks rather than
/// separate OS processes (spec §9 open question "workers are OS
/// processes"), and this function is only ever called once, at the start
/// of a resumed run, before anything has been dispatched. At that single
/// call site "process presence" fails unconditionally: the process
/// calling this has no live worker task for anything it inherited from a
/// prior checkpoint, no matter what `WorkerRecord`s that checkpoint
/// happens to carry, so every `claimed`/`in_progress` task is orphaned by
/// construction and recovered regardless of how recent its persisted
/// heartbeat looks. Heartbeat recency is tracked separately
/// ([`WorkerRecord::touch_heartbeat`]/[`WorkerRecord::is_stale`]) and
/// surfaced through the status snapshot instead (see `status::snapshot`),
/// where it is a meaningful live-process signal.
pub fn tasks_needing_recovery(records: &HashMap<String, TaskExecutionRecord>) -> Vec<TaskId> {
    records
        .values()
        .filter(|r| matches!(r.status, TaskStatus::Claimed | TaskStatus::InProgress))
        .map(|r| r.task_id)
        .collect()
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
