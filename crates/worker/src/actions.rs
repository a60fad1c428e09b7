// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pluggable "produce code" seam (spec §4.2 steps 2, 4, 6: Red, Green,
//! Refactor). Actually generating test/implementation code is delegated to
//! a collaborator outside this core (an authoring agent); this trait is
//! the typed contract the TDD protocol runner drives, the same shape as
//! [`crate::verification::VerificationExecutor`] for the subprocess seam.

use crate::error::WorkerError;
use std::path::PathBuf;
use zerg_core::task::Task;

/// Narration text returned by each action is accumulated by the protocol
/// runner and scanned by the forbidden-phrase guard (spec §4.2).
#[async_trait::async_trait]
pub trait TaskActions: Send + Sync {
    /// Step 2 (Red): produce test code exercising the task's acceptance
    /// criteria. Returns narration describing what was written.
    async fn write_test(&self, task: &Task) -> Result<String, WorkerError>;

    /// Step 4 (Green): produce implementation code. Returns narration.
    async fn write_implementation(&self, task: &Task) -> Result<String, WorkerError>;

    /// Step 6 (Refactor, optional): `Ok(Some(narration))` if a refactor was
    /// exercised, `Ok(None)` if the worker chose to skip it.
    async fn refactor(&self, task: &Task) -> Result<Option<String>, WorkerError>;
}

/// Delegates each step to a configured shell command, the same
/// subprocess-wrapping idiom [`crate::verification::ShellVerificationExecutor`]
/// uses for the verification seam. The actual authoring agent (an external
/// collaborator per spec §4.2) is whatever `*_command` invokes; this type
/// only shells out to it and forwards its stdout+stderr as narration.
#[derive(Debug, Clone)]
pub struct ShellTaskActions {
    workdir: PathBuf,
    write_test_command: String,
    write_implementation_command: String,
    refactor_command: Option<String>,
}

impl ShellTaskActions {
    pub fn new(
        workdir: impl Into<PathBuf>,
        write_test_command: impl Into<String>,
        write_implementation_command: impl Into<String>,
        refactor_command: Option<String>,
    ) -> Self {
        Self {
            workdir: workdir.into(),
            write_test_command: write_test_command.into(),
            write_implementation_command: write_implementation_command.into(),
            refactor_command,
        }
    }

    async fn run(&self, command: &str, task: &Task) -> Result<String, WorkerError> {
        let output = tokio::process::Command::new("bash")
            .arg("-c")
            .arg(command)
            .current_dir(&self.workdir)
            .env("ZERG_TASK_ID", task.id.as_str())
            .env("ZERG_TASK_TITLE", &task.title)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| {
                WorkerError::ProtocolViolation(format!("authoring command failed to spawn: {err}"))
            })?;

        let mut narration = String::from_utf8_lossy(&output.stdout).into_owned();
        narration.push_str(&String::from_utf8_lossy(&output.stderr));
        if !output.status.success() {
            return Err(WorkerError::ProtocolViolation(format!(
                "authoring command exited {}: {narration}",
                output.status
            )));
        }
        tracing::info!(task_id = task.id.as_str(), command, "authoring step completed");
        Ok(narration)
    }
}

#[async_trait::async_trait]
impl TaskActions for ShellTaskActions {
    async fn write_test(&self, task: &Task) -> Result<String, WorkerError> {
        self.run(&self.write_test_command, task).await
    }

    async fn write_implementation(&self, task: &Task) -> Result<String, WorkerError> {
        self.run(&self.write_implementation_command, task).await
    }

    async fn refactor(&self, task: &Task) -> Result<Option<String>, WorkerError> {
        match &self.refactor_command {
            Some(command) => self.run(command, task).await.map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
