// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The on-disk task graph document (spec §6 "Task graph format").

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use zerg_core::task::{Task, TaskId};

/// Current schema version this crate reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

/// One entry in the document's `levels` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelEntry {
    pub name: String,
    pub tasks: Vec<TaskId>,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    #[serde(default)]
    pub estimated_minutes: u32,
    #[serde(default)]
    pub depends_on_levels: Vec<String>,
}

fn default_parallel() -> bool {
    true
}

/// The task graph as it appears on disk, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    pub feature: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub task_count: usize,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub levels: IndexMap<String, LevelEntry>,
}

fn default_version() -> String {
    "1".to_string()
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}
