// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Failures raised by the orchestrator (spec §7 error taxonomy).
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Lock(#[from] zerg_storage::LockError),

    #[error(transparent)]
    Storage(#[from] zerg_storage::StorageError),

    #[error(transparent)]
    EventLog(#[from] zerg_eventlog::EventLogError),

    #[error("no run found for feature {0:?}")]
    NoSuchRun(String),

    #[error("no task {task_id:?} in the run for feature {feature:?}")]
    NoSuchTask { feature: String, task_id: String },

    #[error("task {0:?} is not in a failed state and cannot be retried")]
    NotFailed(String),

    #[error("task graph is corrupt: {0}")]
    GraphCorrupt(#[from] zerg_graph::GraphError),

    /// A spawned worker task panicked instead of returning a
    /// [`zerg_worker::WorkerOutcome`]. Treated as fatal to the run rather
    /// than retried: a panic indicates a bug in the task-authoring or
    /// verification seam, not a transient fault (spec §7).
    #[error("worker task panicked: {0}")]
    WorkerPanicked(String),
}
