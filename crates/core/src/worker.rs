// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker identifier and worker record.
//!
//! Workers are ephemeral: a record exists only while a process is
//! executing a task (spec §3 "Worker record").

use crate::task::TaskId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier for one worker process, generated on pool entry.
    pub struct WorkerId("wkr-");
}

/// Lifecycle status of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Ready,
    Busy,
    Crashed,
    Retired,
}

crate::simple_display! {
    WorkerStatus {
        Ready => "ready",
        Busy => "busy",
        Crashed => "crashed",
        Retired => "retired",
    }
}

/// A worker's record in the run (spec §3 "Worker record").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub id: WorkerId,
    pub status: WorkerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_task: Option<TaskId>,
    /// OS process id of the worker, when spawned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    pub started_at_epoch_ms: u64,
    pub last_heartbeat_epoch_ms: u64,
}

impl WorkerRecord {
    pub fn new(id: WorkerId, current_task: TaskId, pid: Option<u32>, now_epoch_ms: u64) -> Self {
        Self {
            id,
            status: WorkerStatus::Busy,
            current_task: Some(current_task),
            pid,
            started_at_epoch_ms: now_epoch_ms,
            last_heartbeat_epoch_ms: now_epoch_ms,
        }
    }

    pub fn touch_heartbeat(&mut self, now_epoch_ms: u64) {
        self.last_heartbeat_epoch_ms = now_epoch_ms;
    }

    /// A worker is stale when its last heartbeat is older than `horizon_ms`
    /// (spec §9 "heartbeat granularity"). Surfaced through the status
    /// snapshot as a liveness diagnostic; crash recovery at resume does not
    /// consult it (see `decision::tasks_needing_recovery`).
    pub fn is_stale(&self, now_epoch_ms: u64, horizon_ms: u64) -> bool {
        now_epoch_ms.saturating_sub(self.last_heartbeat_epoch_ms) > horizon_ms
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct WorkerRecordBuilder => WorkerRecord {
        into {
            id: WorkerId = "wkr-test0000000000000",
        }
        set {
            status: WorkerStatus = WorkerStatus::Busy,
            started_at_epoch_ms: u64 = 0,
            last_heartbeat_epoch_ms: u64 = 0,
        }
        option {
            current_task: TaskId = None,
            pid: u32 = None,
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
