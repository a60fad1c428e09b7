// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text/JSON rendering for the operator surface (spec §6 `status ... --json`).

use clap::ValueEnum;
use zerg_orchestrator::StatusSnapshot;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn print_status(snapshot: &StatusSnapshot, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(snapshot)?);
        }
        OutputFormat::Text => {
            println!("feature: {}", snapshot.feature);
            println!("state: {}", snapshot.state);
            println!("current_level: {}", snapshot.current_level);
            if snapshot.paused {
                println!("paused: true");
            }
            if let Some(err) = &snapshot.global_error {
                println!("global_error: {err}");
            }
            println!();
            for (level, counts) in &snapshot.levels {
                let total: u32 = counts.values().sum();
                let breakdown = counts
                    .iter()
                    .map(|(status, n)| format!("{status}={n}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("level {level}: {total} task(s) [{breakdown}]");
            }
            if !snapshot.workers.is_empty() {
                println!();
                for worker in &snapshot.workers {
                    let stale = if worker.heartbeat_stale { " [heartbeat stale]" } else { "" };
                    match &worker.record.current_task {
                        Some(task_id) => {
                            println!("{}: {} (task {}){stale}", worker.record.id, worker.record.status, task_id)
                        }
                        None => println!("{}: {}{stale}", worker.record.id, worker.record.status),
                    }
                }
            }
            if !snapshot.last_events.is_empty() {
                println!();
                for event in &snapshot.last_events {
                    println!("{}: {}", event.kind, event.message);
                }
            }
        }
    }
    Ok(())
}
