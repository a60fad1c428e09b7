// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! zerg-cli: the thin operator surface (spec §6) wired to
//! `zerg-orchestrator`. `start`, `status`, `stop`, `retry`, `pause`,
//! `resume` — nothing else. Scaffolding, log viewing beyond the read-side
//! merge, static analysis, and build-system detection are out of scope
//! (spec §1 Non-goals).

pub mod commands;
pub mod exit_error;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build-time version string: crate version plus the short git hash baked
/// in by `build.rs`.
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

#[derive(Parser)]
#[command(name = "zerg", version = VERSION, about = "Dependency-aware, level-synchronized TDD task orchestrator")]
pub struct Cli {
    /// Environment root: `state/`, `logs/`, and `locks/` are laid out
    /// beneath it (spec §6 "Environment inputs").
    #[arg(long, global = true, default_value = ".zerg")]
    pub root: PathBuf,

    /// Path to the feature's task graph JSON document (spec §6 "Task
    /// graph format").
    #[arg(long, global = true)]
    pub graph: PathBuf,

    /// Working directory verification commands (and, for `start`, the
    /// authoring commands) run in. Defaults to the current directory.
    #[arg(long, global = true, default_value = ".")]
    pub workdir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start (or resume) a feature's run.
    Start(commands::start::StartArgs),
    /// Print the current status of a feature's run.
    Status(commands::status::StatusArgs),
    /// Request a running feature to stop.
    Stop(commands::stop::StopArgs),
    /// Reschedule a failed task, or every failed task.
    Retry(commands::retry::RetryArgs),
    /// Pause dispatch for a running feature.
    Pause(commands::pause::PauseArgs),
    /// Resume dispatch for a paused feature.
    Resume(commands::resume::ResumeArgs),
}

/// Dispatch `cli.command` and translate its result into the process exit
/// code `main()` applies (spec §6: "0 success; 1 recoverable failure; 2
/// usage error; 130 operator interrupt").
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Start(args) => commands::start::run(&cli.root, &cli.graph, &cli.workdir, args).await,
        Command::Status(args) => commands::status::run(&cli.root, &cli.graph, &cli.workdir, args),
        Command::Stop(args) => commands::stop::run(&cli.root, &cli.graph, &cli.workdir, args),
        Command::Retry(args) => commands::retry::run(&cli.root, &cli.graph, &cli.workdir, args),
        Command::Pause(args) => commands::pause::run(&cli.root, &cli.graph, &cli.workdir, args),
        Command::Resume(args) => commands::resume::run(&cli.root, &cli.graph, &cli.workdir, args),
    }
}
