// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cycle detection and level/dependency invariant checks.

use crate::error::GraphError;
use crate::schema::GraphDocument;
use indexmap::IndexMap;
use zerg_core::task::{Task, TaskId};

/// Validate a parsed document and return the de-duplicated, indexed task
/// map on success. Does not consult the document's `levels` map beyond
/// checking it references only known tasks — level membership is derived
/// from each task's own `level` field (spec §3: "every identifier in
/// `dependencies` resolves to a task of strictly lower level").
pub fn validate(doc: &GraphDocument) -> Result<IndexMap<TaskId, Task>, GraphError> {
    let mut tasks: IndexMap<TaskId, Task> = IndexMap::new();
    for task in &doc.tasks {
        if tasks.insert(task.id.clone(), task.clone()).is_some() {
            return Err(GraphError::DuplicateTask(task.id.clone()));
        }
    }

    if doc.task_count != tasks.len() {
        return Err(GraphError::TaskCountMismatch { declared: doc.task_count, actual: tasks.len() });
    }

    for task in tasks.values() {
        for dep in &task.dependencies {
            let dep_task = tasks
                .get(dep)
                .ok_or_else(|| GraphError::UnknownDependency {
                    task: task.id.clone(),
                    dependency: dep.clone(),
                })?;
            if dep_task.level >= task.level {
                return Err(GraphError::LevelInvariantViolated {
                    task: task.id.clone(),
                    level: task.level,
                    dependency: dep.clone(),
                    dependency_level: dep_task.level,
                });
            }
        }
    }

    detect_cycles(&tasks)?;

    for (level_name, entry) in &doc.levels {
        for task_id in &entry.tasks {
            if !tasks.contains_key(task_id) {
                return Err(GraphError::LevelReferencesUnknownTask {
                    level_name: level_name.clone(),
                    task: task_id.clone(),
                });
            }
        }
    }

    Ok(tasks)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first cycle detection over the dependency graph. The level
/// invariant already rules out cycles formed solely through strictly
/// decreasing levels, but a corrupt document could still declare two
/// tasks at the same level depending on each other (the level-invariant
/// check above requires strictly *lower*, so same-level or forward
/// references are already rejected by `validate`'s loop above) — this
/// pass exists for defense in depth and to give a precise offending node
/// in the (expected to be unreachable) case of a non-level-respecting
/// cycle slipping through future schema changes.
fn detect_cycles(tasks: &IndexMap<TaskId, Task>) -> Result<(), GraphError> {
    let mut marks: IndexMap<TaskId, Mark> = IndexMap::new();

    for start in tasks.keys() {
        if marks.contains_key(start) {
            continue;
        }
        visit(start, tasks, &mut marks)?;
    }
    Ok(())
}

fn visit(
    id: &TaskId,
    tasks: &IndexMap<TaskId, Task>,
    marks: &mut IndexMap<TaskId, Mark>,
) -> Result<(), GraphError> {
    match marks.get(id) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => return Err(GraphError::Cycle(id.clone())),
        None => {}
    }
    marks.insert(id.clone(), Mark::Visiting);
    if let Some(task) = tasks.get(id) {
        for dep in &task.dependencies {
            visit(dep, tasks, marks)?;
        }
    }
    marks.insert(id.clone(), Mark::Done);
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
