// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use zerg_core::task::TaskId;

/// Failures raised while loading or validating a task graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("failed to read task graph at {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("failed to parse task graph JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("task {0} appears more than once in the graph")]
    DuplicateTask(TaskId),

    #[error("task {task} depends on unknown task {dependency}")]
    UnknownDependency { task: TaskId, dependency: TaskId },

    #[error("task {task} at level {level} depends on {dependency} at level {dependency_level}, which is not strictly lower")]
    LevelInvariantViolated { task: TaskId, level: u32, dependency: TaskId, dependency_level: u32 },

    #[error("task graph contains a dependency cycle involving {0}")]
    Cycle(TaskId),

    #[error("level entry {level_name:?} references unknown task {task}")]
    LevelReferencesUnknownTask { level_name: String, task: TaskId },

    #[error("declared task_count {declared} does not match {actual} tasks found")]
    TaskCountMismatch { declared: usize, actual: usize },
}
