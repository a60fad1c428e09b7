// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Args;
use std::path::Path;

#[derive(Args)]
pub struct StopArgs {
    /// Feature name.
    pub feature: String,

    /// Mark in-flight tasks stale instead of leaving them to be resumed
    /// later (spec §4.1 `stop --force`).
    #[arg(long)]
    pub force: bool,
}

pub fn run(root: &Path, graph_path: &Path, workdir: &Path, args: StopArgs) -> anyhow::Result<()> {
    let orchestrator = super::open_orchestrator(
        root,
        graph_path,
        workdir,
        &args.feature,
        None,
        super::unused_actions(),
    )?;
    orchestrator.stop(args.force)?;
    println!("stop requested for feature {}", args.feature);
    Ok(())
}
