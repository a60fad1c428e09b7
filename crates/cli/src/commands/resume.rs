// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Args;
use std::path::Path;

#[derive(Args)]
pub struct ResumeArgs {
    /// Feature name.
    pub feature: String,
}

pub fn run(root: &Path, graph_path: &Path, workdir: &Path, args: ResumeArgs) -> anyhow::Result<()> {
    let orchestrator = super::open_orchestrator(
        root,
        graph_path,
        workdir,
        &args.feature,
        None,
        super::unused_actions(),
    )?;
    orchestrator.resume()?;
    println!("resumed feature {}", args.feature);
    Ok(())
}
