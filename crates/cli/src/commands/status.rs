// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::output::{print_status, OutputFormat};
use clap::Args;
use std::path::Path;

#[derive(Args)]
pub struct StatusArgs {
    /// Feature name.
    pub feature: String,

    /// Restrict the snapshot to a single level.
    #[arg(long)]
    pub level: Option<u32>,

    /// Print machine-readable JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

pub fn run(root: &Path, graph_path: &Path, workdir: &Path, args: StatusArgs) -> anyhow::Result<()> {
    let orchestrator = super::open_orchestrator(
        root,
        graph_path,
        workdir,
        &args.feature,
        None,
        super::unused_actions(),
    )?;
    let snapshot = orchestrator.get_status(args.level)?;
    let format = if args.json { OutputFormat::Json } else { OutputFormat::Text };
    print_status(&snapshot, format)
}
