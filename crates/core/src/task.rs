// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task identifier and the immutable per-run task definition.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

crate::define_id! {
    /// Stable task identifier, supplied by the task graph (never generated).
    pub struct TaskId;
}

/// The three disjoint file sets a task declares it will touch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePlan {
    #[serde(default)]
    pub create: BTreeSet<String>,
    #[serde(default)]
    pub modify: BTreeSet<String>,
    #[serde(default)]
    pub read: BTreeSet<String>,
}

/// A shell-equivalent verification command and its timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationContract {
    pub command: String,
    pub timeout_secs: u32,
}

impl VerificationContract {
    pub const DEFAULT_TIMEOUT_SECS: u32 = 60;
    pub const MAX_TIMEOUT_SECS: u32 = 600;

    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), timeout_secs: Self::DEFAULT_TIMEOUT_SECS }
    }

    pub fn with_timeout(command: impl Into<String>, timeout_secs: u32) -> Self {
        Self { command: command.into(), timeout_secs }
    }

    /// Clamp the contract's timeout to the 600s build-system ceiling.
    pub fn clamped_timeout_secs(&self) -> u32 {
        self.timeout_secs.min(Self::MAX_TIMEOUT_SECS)
    }
}

/// One action in a task's optional pre-generated step list (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    WriteTest,
    VerifyFail,
    Implement,
    VerifyPass,
    Format,
    Commit,
}

crate::simple_display! {
    StepAction {
        WriteTest => "write_test",
        VerifyFail => "verify_fail",
        Implement => "implement",
        VerifyPass => "verify_pass",
        Format => "format",
        Commit => "commit",
    }
}

/// Expected outcome of a step's command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyMode {
    /// Zero exit required.
    ExitCode,
    /// Non-zero exit required (used by `verify_fail`).
    ExitCodeNonzero,
    /// No verification; the command's exit code is not inspected.
    None,
}

impl VerifyMode {
    /// Whether `exit_code` satisfies this mode. Always true for `None`.
    pub fn is_satisfied_by(self, exit_code: i32) -> bool {
        match self {
            VerifyMode::ExitCode => exit_code == 0,
            VerifyMode::ExitCodeNonzero => exit_code != 0,
            VerifyMode::None => true,
        }
    }
}

/// A single ordered step in a task's optional step list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step: u32,
    pub action: StepAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    #[serde(default = "default_verify_mode")]
    pub verify: VerifyMode,
}

fn default_verify_mode() -> VerifyMode {
    VerifyMode::ExitCode
}

/// A task's immutable definition, as read from the task graph.
///
/// Invariant: every identifier in `dependencies` resolves to a task of
/// strictly lower `level` (enforced by `zerg-graph` at load time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub level: u32,
    #[serde(default)]
    pub dependencies: BTreeSet<TaskId>,
    #[serde(default)]
    pub file_plan: FilePlan,
    pub verification: VerificationContract,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,
    pub estimate_minutes: u32,
    #[serde(default)]
    pub critical_path: bool,
}

impl Task {
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        level: u32,
        verification: VerificationContract,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            level,
            dependencies: BTreeSet::new(),
            file_plan: FilePlan::default(),
            verification,
            steps: None,
            estimate_minutes: 0,
            critical_path: false,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct TaskBuilder => Task {
        into {
            id: TaskId = "task-1",
            title: String = "test task",
        }
        set {
            level: u32 = 1,
            dependencies: std::collections::BTreeSet<TaskId> = std::collections::BTreeSet::new(),
            file_plan: FilePlan = FilePlan::default(),
            verification: VerificationContract = VerificationContract::new("true"),
            steps: Option<Vec<Step>> = None,
            estimate_minutes: u32 = 5,
            critical_path: bool = false,
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
