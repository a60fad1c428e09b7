// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Args;
use std::path::Path;

#[derive(Args)]
#[command(group(clap::ArgGroup::new("target").required(true).args(["task", "all_failed"])))]
pub struct RetryArgs {
    /// Feature name.
    pub feature: String,

    /// Reschedule this one task (must currently be `failed`).
    #[arg(long)]
    pub task: Option<String>,

    /// Reschedule every currently-`failed` task.
    #[arg(long = "all-failed")]
    pub all_failed: bool,
}

pub fn run(root: &Path, graph_path: &Path, workdir: &Path, args: RetryArgs) -> anyhow::Result<()> {
    let orchestrator = super::open_orchestrator(
        root,
        graph_path,
        workdir,
        &args.feature,
        None,
        super::unused_actions(),
    )?;
    match args.task.as_deref() {
        Some(task_id) => {
            orchestrator.retry_task(task_id)?;
            println!("rescheduled task {task_id}");
        }
        None if args.all_failed => {
            let retried = orchestrator.retry_all_failed()?;
            println!("rescheduled {retried} failed task(s)");
        }
        None => {
            // The clap group makes this unreachable from the parsed CLI, but
            // `RetryArgs` can also be constructed directly (e.g. in tests).
            anyhow::bail!("one of --task or --all-failed is required");
        }
    }
    Ok(())
}
