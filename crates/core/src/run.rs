// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-feature run record and the orchestrator's overall state machine.

use crate::task::TaskId;
use crate::task_exec::TaskExecutionRecord;
use crate::worker::WorkerRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Overall orchestrator state machine (spec §4.1):
/// `IDLE -> RUNNING <-> PAUSED -> {COMPLETE | FAILED | STOPPED}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Complete,
    Failed,
    Stopped,
}

crate::simple_display! {
    RunState {
        Idle => "idle",
        Running => "running",
        Paused => "paused",
        Complete => "complete",
        Failed => "failed",
        Stopped => "stopped",
    }
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Complete | RunState::Failed | RunState::Stopped)
    }
}

/// Running totals maintained on the run record (spec §3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub completed: u64,
    pub failed: u64,
    pub retried: u64,
}

/// One entry in the bounded event log embedded in the run record.
///
/// This is distinct from the append-only JSONL structured event log
/// (`zerg-eventlog`): it is a short, size-bounded tail kept inline on the
/// run record so `get_status` can return "the last N events" without
/// reading the JSONL shards (spec §4.1 status contract).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub at_epoch_ms: u64,
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
}

/// Maximum number of inline events retained on a run record (spec §3:
/// "bounded in size; oldest entries may be pruned without affecting
/// correctness").
pub const MAX_INLINE_EVENTS: usize = 200;

/// The durable, per-feature run record (spec §3 "Run record", §6 "State
/// record format").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub feature: String,
    pub state: RunState,
    pub current_level: u32,
    #[serde(default)]
    pub paused: bool,
    /// Set by the `stop` operator command and observed by the running
    /// dispatch loop at its next checkpoint; distinct from `state` because
    /// the request and the drained terminal `Stopped` state are not the
    /// same instant (spec §6 `stop`).
    #[serde(default)]
    pub stop_requested: bool,
    #[serde(default)]
    pub stop_force: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_error: Option<String>,
    pub tasks: HashMap<String, TaskExecutionRecord>,
    #[serde(default)]
    pub workers: HashMap<String, WorkerRecord>,
    #[serde(default)]
    pub totals: RunTotals,
    #[serde(default)]
    pub events: Vec<RunEvent>,
    /// Unrecognized fields round-trip untouched for forward compatibility
    /// (spec §9 re-architecture guidance).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RunRecord {
    pub fn new(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            state: RunState::Idle,
            current_level: 1,
            paused: false,
            stop_requested: false,
            stop_force: false,
            global_error: None,
            tasks: HashMap::new(),
            workers: HashMap::new(),
            totals: RunTotals::default(),
            events: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Append an event to the bounded inline tail, pruning the oldest entry
    /// once [`MAX_INLINE_EVENTS`] is exceeded.
    pub fn push_event(&mut self, event: RunEvent) {
        self.events.push(event);
        if self.events.len() > MAX_INLINE_EVENTS {
            let excess = self.events.len() - MAX_INLINE_EVENTS;
            self.events.drain(0..excess);
        }
    }

    pub fn last_events(&self, n: usize) -> &[RunEvent] {
        let start = self.events.len().saturating_sub(n);
        &self.events[start..]
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
