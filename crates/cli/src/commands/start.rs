// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::exit_error::ExitError;
use anyhow::Context;
use clap::Args;
use std::path::Path;
use std::sync::Arc;
use zerg_core::RunState;
use zerg_worker::ShellTaskActions;

#[derive(Args)]
pub struct StartArgs {
    /// Feature name (must match the task graph's `feature` field).
    pub feature: String,

    /// Worker pool size (spec §5; default 5).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Resume a previously checkpointed run instead of starting fresh.
    #[arg(long)]
    pub resume: bool,

    /// Shell command invoked for each task's Red step. Receives
    /// `ZERG_TASK_ID` and `ZERG_TASK_TITLE` in its environment.
    #[arg(long = "test-cmd")]
    pub test_cmd: String,

    /// Shell command invoked for each task's Green step.
    #[arg(long = "impl-cmd")]
    pub impl_cmd: String,

    /// Shell command invoked for each task's optional Refactor step. If
    /// omitted, refactor is skipped for every task.
    #[arg(long = "refactor-cmd")]
    pub refactor_cmd: Option<String>,
}

pub async fn run(root: &Path, graph_path: &Path, workdir: &Path, args: StartArgs) -> anyhow::Result<()> {
    let actions =
        Arc::new(ShellTaskActions::new(workdir, args.test_cmd, args.impl_cmd, args.refactor_cmd));
    let orchestrator = super::open_orchestrator(
        root,
        graph_path,
        workdir,
        &args.feature,
        args.workers,
        actions,
    )?;

    let start_fut = orchestrator.start(args.resume);
    tokio::pin!(start_fut);
    enum Outcome {
        Finished(RunState),
        Interrupted,
    }
    let outcome = tokio::select! {
        result = &mut start_fut => Outcome::Finished(result.context("running feature")?),
        _ = tokio::signal::ctrl_c() => Outcome::Interrupted,
    };
    match outcome {
        Outcome::Finished(state) => finish(state),
        Outcome::Interrupted => {
            tracing::warn!(feature = %args.feature, "interrupt received, requesting graceful stop");
            orchestrator.stop(false).context("requesting stop after interrupt")?;
            start_fut.await.context("draining after interrupt")?;
            Err(ExitError::new(130, "interrupted").into())
        }
    }
}

fn finish(state: RunState) -> anyhow::Result<()> {
    match state {
        RunState::Complete => Ok(()),
        RunState::Failed | RunState::Stopped => {
            Err(ExitError::new(1, format!("run ended in state {state}")).into())
        }
        other => Err(ExitError::new(1, format!("run ended in unexpected state {other}")).into()),
    }
}
