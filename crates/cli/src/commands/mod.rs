// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations.

pub mod pause;
pub mod resume;
pub mod retry;
pub mod start;
pub mod status;
pub mod stop;

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use zerg_core::clock::SystemClock;
use zerg_graph::TaskGraph;
use zerg_orchestrator::{Orchestrator, OrchestratorConfig};
use zerg_worker::{ShellTaskActions, ShellVerificationExecutor, TaskActions, VerificationExecutor};

/// Load the task graph and wire an [`Orchestrator`] rooted at `root`,
/// running verification (and, for `start`, authoring) commands in
/// `workdir`. Shared by every subcommand since `Orchestrator::new` needs
/// the graph to build its level map even for read-only operator calls.
pub(crate) fn open_orchestrator(
    root: &Path,
    graph_path: &Path,
    workdir: &Path,
    feature: &str,
    worker_count: Option<usize>,
    actions: Arc<dyn TaskActions>,
) -> anyhow::Result<Orchestrator<SystemClock>> {
    let graph = TaskGraph::load(graph_path)
        .with_context(|| format!("loading task graph from {}", graph_path.display()))?;
    if graph.feature() != feature {
        anyhow::bail!(
            "task graph at {} is for feature {:?}, not {:?}",
            graph_path.display(),
            graph.feature(),
            feature,
        );
    }
    let mut config = OrchestratorConfig::new(root);
    if let Some(n) = worker_count {
        config = config.with_worker_count(n);
    }
    let verifier: Arc<dyn VerificationExecutor> = Arc::new(ShellVerificationExecutor::new());
    Orchestrator::new(config, feature, graph, workdir, actions, verifier, SystemClock)
        .context("constructing orchestrator")
}

/// A [`TaskActions`] that is never invoked: every subcommand except
/// `start` only reads or mutates the run record, but `Orchestrator::new`
/// still requires an actions seam to construct.
pub(crate) fn unused_actions() -> Arc<dyn TaskActions> {
    Arc::new(ShellTaskActions::new(
        std::env::temp_dir(),
        "true",
        "true",
        None,
    ))
}
