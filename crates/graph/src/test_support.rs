// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixtures for other crates' tests. Gated behind `test-support` so
//! `zerg-orchestrator` and `zerg-cli` can build representative graphs
//! without hand-writing JSON documents.

use crate::schema::{GraphDocument, LevelEntry};
use crate::TaskGraph;
use indexmap::IndexMap;
use zerg_core::task::{Task, VerificationContract};

/// The graph used by spec scenario S1: two independent level-1 tasks,
/// two level-2 tasks depending on them.
pub fn happy_path_graph() -> TaskGraph {
    let t1_1 = Task::new("T1.1", "lay out the data model", 1, VerificationContract::new("true"));
    let t1_2 = Task::new("T1.2", "stub the http client", 1, VerificationContract::new("true"));

    let mut t2_1 = Task::new("T2.1", "wire client into model", 2, VerificationContract::new("true"));
    t2_1.dependencies.insert(t1_1.id);

    let mut t2_2 = Task::new("T2.2", "integration smoke test", 2, VerificationContract::new("true"));
    t2_2.dependencies.insert(t1_1.id);
    t2_2.dependencies.insert(t1_2.id);

    let tasks = vec![t1_1, t1_2, t2_1, t2_2];
    graph_from_tasks("checkout-flow", tasks)
}

/// Build a `TaskGraph` straight from an already-constructed task list,
/// deriving `levels` entries and `task_count` automatically.
pub fn graph_from_tasks(feature: &str, tasks: Vec<Task>) -> TaskGraph {
    let mut by_level: IndexMap<u32, Vec<zerg_core::task::TaskId>> = IndexMap::new();
    for task in &tasks {
        by_level.entry(task.level).or_default().push(task.id);
    }
    let mut levels = IndexMap::new();
    for (level, task_ids) in by_level {
        levels.insert(
            level.to_string(),
            LevelEntry {
                name: level.to_string(),
                tasks: task_ids,
                parallel: true,
                estimated_minutes: 0,
                depends_on_levels: if level > 1 { vec![(level - 1).to_string()] } else { vec![] },
            },
        );
    }
    let doc = GraphDocument {
        feature: feature.to_string(),
        version: "1".to_string(),
        schema_version: crate::SCHEMA_VERSION,
        task_count: tasks.len(),
        tasks,
        levels,
    };
    TaskGraph::from_document(doc).expect("fixture graph document validates")
}
