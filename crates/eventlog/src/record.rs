// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The structured event record (spec §4.5).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zerg_core::task::TaskId;
use zerg_core::worker::WorkerId;

/// Severity, matching `tracing`'s levels so the event log and the
/// in-process `tracing` spans agree on vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

zerg_core::simple_display! {
    EventLevel {
        Info => "info",
        Warn => "warn",
        Error => "error",
    }
}

/// Who emitted the event: the orchestrator itself, or a specific worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "origin_kind", content = "origin_id")]
pub enum EventOrigin {
    Orchestrator,
    Worker(WorkerId),
}

impl std::fmt::Display for EventOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventOrigin::Orchestrator => write!(f, "orchestrator"),
            EventOrigin::Worker(id) => write!(f, "{id}"),
        }
    }
}

/// One line in a JSONL shard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp: DateTime<Utc>,
    pub level: EventLevel,
    pub origin: EventOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl EventRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        level: EventLevel,
        origin: EventOrigin,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            level,
            origin,
            task_id: None,
            kind: kind.into(),
            message: message.into(),
            data: serde_json::Value::Null,
        }
    }

    pub fn with_task_id(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
