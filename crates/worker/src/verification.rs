// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The verification subprocess contract (spec §4.2): spawn a shell-equivalent
//! interpreter with the task's verification command, capture stdout+stderr
//! concatenated, and enforce a timeout.

use std::path::Path;
use std::time::Duration;
use zerg_core::VerificationResult;

/// Default per-task verification timeout when none is configured.
pub const DEFAULT_VERIFICATION_TIMEOUT_SECS: u32 = 60;

/// No verification command may run longer than this regardless of what a
/// task requests (spec §4.2: "600s ceiling for builds").
pub const MAX_VERIFICATION_TIMEOUT_SECS: u32 = 600;

/// Runs a task's verification command and reports a structured result.
///
/// Pluggable so `zerg-orchestrator` can substitute a fake in tests without
/// spawning real processes.
#[async_trait::async_trait]
pub trait VerificationExecutor: Send + Sync {
    async fn execute(&self, command: &str, timeout_secs: u32, cwd: &Path) -> VerificationResult;
}

/// Spawns the verification command through `bash -c`, the same shell-wrapping
/// idiom used for one-off commands elsewhere in this codebase.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellVerificationExecutor;

impl ShellVerificationExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl VerificationExecutor for ShellVerificationExecutor {
    async fn execute(&self, command: &str, timeout_secs: u32, cwd: &Path) -> VerificationResult {
        let timeout_secs = timeout_secs.clamp(1, MAX_VERIFICATION_TIMEOUT_SECS);

        let mut cmd = tokio::process::Command::new("bash");
        cmd.arg("-c").arg(command).current_dir(cwd).kill_on_drop(true);

        tracing::info!(command, timeout_secs, cwd = %cwd.display(), "running verification command");

        match tokio::time::timeout(Duration::from_secs(u64::from(timeout_secs)), cmd.output()).await
        {
            Ok(Ok(output)) => {
                let mut transcript = String::from_utf8_lossy(&output.stdout).into_owned();
                transcript.push_str(&String::from_utf8_lossy(&output.stderr));
                let exit_code = output.status.code().unwrap_or(-1);
                if exit_code == 0 {
                    tracing::info!(command, exit_code, "verification passed");
                } else {
                    tracing::warn!(command, exit_code, "verification failed");
                }
                VerificationResult {
                    command: command.to_string(),
                    exit_code,
                    transcript,
                    timed_out: false,
                }
            }
            Ok(Err(err)) => {
                tracing::error!(command, error = %err, "verification command failed to spawn");
                VerificationResult {
                    command: command.to_string(),
                    exit_code: -1,
                    transcript: format!("failed to run verification command: {err}"),
                    timed_out: false,
                }
            }
            Err(_) => {
                tracing::warn!(command, timeout_secs, "verification command timed out");
                VerificationResult {
                    command: command.to_string(),
                    exit_code: -1,
                    transcript: format!("Timeout after {timeout_secs}s"),
                    timed_out: true,
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "verification_tests.rs"]
mod tests;
