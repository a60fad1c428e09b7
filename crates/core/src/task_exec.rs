// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mutable run-state for a task: the `pending -> claimed -> in_progress ->
//! {complete | failed | stale}` machine described in spec §3.

use crate::task::TaskId;
use crate::worker::WorkerId;
use serde::{Deserialize, Serialize};

/// Status of a task's execution record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Claimed,
    InProgress,
    Complete,
    Failed,
    Stale,
}

crate::simple_display! {
    TaskStatus {
        Pending => "pending",
        Claimed => "claimed",
        InProgress => "in_progress",
        Complete => "complete",
        Failed => "failed",
        Stale => "stale",
    }
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Complete | TaskStatus::Failed | TaskStatus::Stale)
    }

    /// Whether a transition to `next` is permitted by the task state machine
    /// in spec §3 (`pending -> claimed -> in_progress -> {complete | failed |
    /// stale}`, with `failed -> pending` on retry and any non-terminal state
    /// `-> pending` on crash recovery).
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, next),
            (Pending, Claimed)
                | (Claimed, InProgress)
                | (Claimed, Pending) // crash recovery
                | (InProgress, Complete)
                | (InProgress, Failed)
                | (InProgress, Stale)
                | (InProgress, Pending) // crash recovery
                | (Failed, Pending) // retry scheduled
        )
    }
}

/// Mutable run-state for one task (spec §3 "Task execution record").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskExecutionRecord {
    pub task_id: TaskId,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<WorkerId>,
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transcript: Option<String>,
    /// Epoch-ms timestamps of each observed transition, oldest first.
    #[serde(default)]
    pub transitions: Vec<TransitionRecord>,
}

/// One recorded transition, for the audit trail backing property 1 (level
/// barrier) and property 7 (retry monotonicity) in spec §8.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub status: TaskStatus,
    pub at_epoch_ms: u64,
}

impl TaskExecutionRecord {
    pub fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            status: TaskStatus::Pending,
            owner: None,
            retry_count: 0,
            last_error: None,
            last_transcript: None,
            transitions: Vec::new(),
        }
    }

    /// Apply a validated transition, recording its timestamp.
    ///
    /// Panics (debug-only) if the transition violates the task state
    /// machine; callers are expected to check [`TaskStatus::can_transition_to`]
    /// themselves when the caller needs to choose a fallback instead of
    /// asserting.
    pub fn transition(&mut self, next: TaskStatus, at_epoch_ms: u64) {
        debug_assert!(
            self.status.can_transition_to(next),
            "illegal task transition {:?} -> {:?}",
            self.status,
            next
        );
        self.status = next;
        self.transitions.push(TransitionRecord { status: next, at_epoch_ms });
    }

    /// Schedule a retry: `failed -> pending`, incrementing the retry
    /// counter. Retry counts never decrease (spec §3 monotonicity, §8
    /// property 7).
    pub fn schedule_retry(&mut self, at_epoch_ms: u64) {
        self.transition(TaskStatus::Pending, at_epoch_ms);
        self.retry_count += 1;
        self.owner = None;
    }

    /// Revert a `claimed`/`in_progress` task to `pending` on crash recovery.
    /// Whether this charges the retry budget is a run-level policy decision
    /// (spec §9 open question); callers pass `charge_retry` explicitly.
    pub fn revert_for_crash_recovery(&mut self, at_epoch_ms: u64, charge_retry: bool) {
        self.transition(TaskStatus::Pending, at_epoch_ms);
        if charge_retry {
            self.retry_count += 1;
        }
        self.owner = None;
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct TaskExecutionRecordBuilder => TaskExecutionRecord {
        into {
            task_id: TaskId = "task-1",
        }
        set {
            status: TaskStatus = TaskStatus::Pending,
            retry_count: u32 = 0,
            transitions: Vec<TransitionRecord> = Vec::new(),
        }
        option {
            owner: WorkerId = None,
            last_error: String = None,
            last_transcript: String = None,
        }
    }
}

#[cfg(test)]
#[path = "task_exec_tests.rs"]
mod tests;
