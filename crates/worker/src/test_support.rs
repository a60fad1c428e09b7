// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fakes for driving the TDD protocol deterministically, without spawning
//! real subprocesses. Used by this crate's own tests and by
//! `zerg-orchestrator`'s scenario tests.

use crate::actions::TaskActions;
use crate::error::WorkerError;
use crate::verification::VerificationExecutor;
use parking_lot::Mutex;
use std::path::Path;
use zerg_core::task::Task;
use zerg_core::VerificationResult;

/// Returns a scripted sequence of [`VerificationResult`]s, one per call to
/// `execute`, regardless of the command given. Panics (in test code only)
/// if exhausted.
pub struct ScriptedVerifier {
    results: Mutex<std::collections::VecDeque<VerificationResult>>,
}

impl ScriptedVerifier {
    pub fn new(results: Vec<VerificationResult>) -> Self {
        Self { results: Mutex::new(results.into()) }
    }

    /// Always-fail-then-always-pass: the common red/green shape.
    pub fn red_then_green() -> Self {
        Self::new(vec![fail_result(), pass_result()])
    }

    pub fn always_pass() -> Self {
        Self { results: Mutex::new(std::collections::VecDeque::new()) }
    }
}

pub fn pass_result() -> VerificationResult {
    VerificationResult { command: "true".into(), exit_code: 0, transcript: "ok".into(), timed_out: false }
}

pub fn fail_result() -> VerificationResult {
    VerificationResult { command: "false".into(), exit_code: 1, transcript: "fail".into(), timed_out: false }
}

pub fn timeout_result() -> VerificationResult {
    VerificationResult {
        command: "sleep 999".into(),
        exit_code: -1,
        transcript: "Timeout after 1s".into(),
        timed_out: true,
    }
}

#[async_trait::async_trait]
impl VerificationExecutor for ScriptedVerifier {
    async fn execute(&self, _command: &str, _timeout_secs: u32, _cwd: &Path) -> VerificationResult {
        let mut results = self.results.lock();
        results.pop_front().unwrap_or_else(pass_result)
    }
}

/// Actions that return clean, non-forbidden narration by default. Each
/// field can be swapped for a narration string containing a forbidden
/// phrase to exercise the guard.
pub struct FakeActions {
    pub test_narration: String,
    pub implementation_narration: String,
    pub refactor_narration: Option<String>,
    pub fail_write_test: bool,
    pub fail_write_implementation: bool,
}

impl Default for FakeActions {
    fn default() -> Self {
        Self {
            test_narration: "wrote a failing test for the new behavior".into(),
            implementation_narration: "implemented the behavior the test exercises".into(),
            refactor_narration: None,
            fail_write_test: false,
            fail_write_implementation: false,
        }
    }
}

#[async_trait::async_trait]
impl TaskActions for FakeActions {
    async fn write_test(&self, _task: &Task) -> Result<String, WorkerError> {
        if self.fail_write_test {
            return Err(WorkerError::ProtocolViolation("failed to write test".into()));
        }
        Ok(self.test_narration.clone())
    }

    async fn write_implementation(&self, _task: &Task) -> Result<String, WorkerError> {
        if self.fail_write_implementation {
            return Err(WorkerError::ProtocolViolation("failed to write implementation".into()));
        }
        Ok(self.implementation_narration.clone())
    }

    async fn refactor(&self, _task: &Task) -> Result<Option<String>, WorkerError> {
        Ok(self.refactor_narration.clone())
    }
}
