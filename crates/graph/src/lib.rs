// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! zerg-graph: the immutable, validated task graph (spec §3, §6).

pub mod error;
pub mod schema;
mod validate;

use indexmap::IndexMap;
use std::path::Path;
use zerg_core::task::{Task, TaskId};

pub use error::GraphError;
pub use schema::{GraphDocument, LevelEntry, SCHEMA_VERSION};

/// An immutable, validated task graph: tasks indexed by id and grouped by
/// level. Constructed once per run and never mutated (spec §1 Non-goals:
/// "dynamic task graphs").
#[derive(Debug, Clone)]
pub struct TaskGraph {
    feature: String,
    tasks: IndexMap<TaskId, Task>,
    levels: Vec<u32>,
}

impl TaskGraph {
    /// Parse and validate a graph document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let doc: GraphDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    /// Load and validate a graph document from a file on disk.
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| GraphError::Io { path: path.display().to_string(), source })?;
        Self::from_json(&contents)
    }

    pub(crate) fn from_document(doc: GraphDocument) -> Result<Self, GraphError> {
        let tasks = validate::validate(&doc)?;
        let mut levels: Vec<u32> = tasks.values().map(|t| t.level).collect();
        levels.sort_unstable();
        levels.dedup();
        tracing::info!(
            feature = %doc.feature,
            task_count = tasks.len(),
            level_count = levels.len(),
            "task graph loaded and validated"
        );
        Ok(Self { feature: doc.feature, tasks, levels })
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Distinct levels present in the graph, ascending.
    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    pub fn min_level(&self) -> Option<u32> {
        self.levels.first().copied()
    }

    pub fn max_level(&self) -> Option<u32> {
        self.levels.last().copied()
    }

    /// Tasks at exactly `level`, in the graph's original declaration order.
    pub fn tasks_at_level(&self, level: u32) -> Vec<&Task> {
        self.tasks.values().filter(|t| t.level == level).collect()
    }

    /// The level immediately after `level` that has any task, if one exists.
    pub fn next_level_after(&self, level: u32) -> Option<u32> {
        self.levels.iter().copied().find(|&l| l > level)
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
