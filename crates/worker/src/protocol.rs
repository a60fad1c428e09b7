// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The red -> green -> verify -> refactor TDD protocol runner (spec §4.2),
//! plus the optional pre-generated step-list path.

use crate::actions::TaskActions;
use crate::forbidden_phrase;
use crate::outcome::{ProtocolViolation, WorkerOutcome};
use crate::verification::VerificationExecutor;
use std::path::Path;
use zerg_core::task::{StepAction, Task};
use zerg_core::{TddCertificate, VerificationResult};

/// Drives exactly one task through the TDD protocol and returns a
/// structured [`WorkerOutcome`]. Stateless and reusable across tasks; all
/// per-task state lives in the returned outcome.
pub struct TddProtocolRunner<'a> {
    actions: &'a dyn TaskActions,
    verifier: &'a dyn VerificationExecutor,
    /// Touched after every protocol step when set (spec §9 "heartbeat
    /// granularity"); `None` for callers with no liveness tracking to
    /// update (e.g. unit tests).
    heartbeat: Option<&'a (dyn Fn() + Send + Sync)>,
}

impl<'a> TddProtocolRunner<'a> {
    pub fn new(actions: &'a dyn TaskActions, verifier: &'a dyn VerificationExecutor) -> Self {
        Self { actions, verifier, heartbeat: None }
    }

    /// Attach a heartbeat callback, invoked after every write/verify step so
    /// a caller tracking worker liveness (spec §3 "Worker record") can touch
    /// the owning worker's last-heartbeat timestamp as the task progresses.
    pub fn with_heartbeat(mut self, heartbeat: &'a (dyn Fn() + Send + Sync)) -> Self {
        self.heartbeat = Some(heartbeat);
        self
    }

    fn touch_heartbeat(&self) {
        if let Some(heartbeat) = self.heartbeat {
            heartbeat();
        }
    }

    /// Execute `task`'s protocol in `cwd`. Dispatches to the step-list path
    /// when the task carries one (spec §4.2 "step-based execution"),
    /// otherwise the classic whole-task red/green/verify/refactor cycle.
    pub async fn run(&self, task: &Task, cwd: &Path) -> WorkerOutcome {
        match &task.steps {
            Some(steps) => self.run_steps(task, steps, cwd).await,
            None => self.run_whole_task(task, cwd).await,
        }
    }

    async fn verify(&self, task: &Task, cwd: &Path) -> VerificationResult {
        self.verifier
            .execute(&task.verification.command, task.verification.clamped_timeout_secs(), cwd)
            .await
    }

    fn action_failure(verification_command: &str, err: impl std::fmt::Display) -> VerificationResult {
        VerificationResult {
            command: verification_command.to_string(),
            exit_code: -1,
            transcript: err.to_string(),
            timed_out: false,
        }
    }

    async fn run_whole_task(&self, task: &Task, cwd: &Path) -> WorkerOutcome {
        let mut certificate = TddCertificate::new();
        let mut narration = String::new();

        // 1. Plan is a no-op here: the task's file plan and description
        // are read by `actions`, not bookkept by the protocol runner.

        // 2. Red.
        match self.actions.write_test(task).await {
            Ok(text) => {
                certificate.test_written = true;
                narration.push_str(&text);
                narration.push('\n');
            }
            Err(err) => {
                return WorkerOutcome::VerificationFailed {
                    certificate,
                    verification: Self::action_failure(&task.verification.command, err),
                };
            }
        }
        self.touch_heartbeat();

        // 3. Verify fail.
        let red_result = self.verify(task, cwd).await;
        if red_result.timed_out {
            return WorkerOutcome::Timeout { verification: red_result };
        }
        if red_result.passed() {
            return WorkerOutcome::ProtocolViolation {
                violation: ProtocolViolation::VerifyFailStepPassed,
                certificate,
                verification: Some(red_result),
            };
        }
        certificate.test_failed_initially = true;
        self.touch_heartbeat();

        // 4. Green.
        match self.actions.write_implementation(task).await {
            Ok(text) => {
                certificate.implementation_written = true;
                narration.push_str(&text);
                narration.push('\n');
            }
            Err(err) => {
                return WorkerOutcome::VerificationFailed {
                    certificate,
                    verification: Self::action_failure(&task.verification.command, err),
                };
            }
        }
        self.touch_heartbeat();

        // 5. Verify pass.
        let green_result = self.verify(task, cwd).await;
        if green_result.timed_out {
            return WorkerOutcome::Timeout { verification: green_result };
        }
        if !green_result.passed() {
            return WorkerOutcome::VerificationFailed { certificate, verification: green_result };
        }
        certificate.test_passed_finally = true;
        self.touch_heartbeat();
        let mut final_verification = green_result;

        // 6. Refactor (optional): if exercised, re-verification must pass.
        match self.actions.refactor(task).await {
            Ok(Some(text)) => {
                certificate.refactored = true;
                narration.push_str(&text);
                narration.push('\n');
                self.touch_heartbeat();
                let refactor_result = self.verify(task, cwd).await;
                if refactor_result.timed_out {
                    return WorkerOutcome::Timeout { verification: refactor_result };
                }
                if !refactor_result.passed() {
                    return WorkerOutcome::ProtocolViolation {
                        violation: ProtocolViolation::RefactorVerificationFailed,
                        certificate,
                        verification: Some(refactor_result),
                    };
                }
                final_verification = refactor_result;
            }
            Ok(None) => {}
            Err(err) => {
                return WorkerOutcome::VerificationFailed {
                    certificate,
                    verification: Self::action_failure(&task.verification.command, err),
                };
            }
        }

        self.accept_or_reject(certificate, narration, final_verification)
    }

    async fn run_steps(
        &self,
        task: &Task,
        steps: &[zerg_core::task::Step],
        cwd: &Path,
    ) -> WorkerOutcome {
        let mut certificate = TddCertificate::new();
        let mut narration = String::new();
        let mut last_verification: Option<VerificationResult> = None;

        for (index, step) in steps.iter().enumerate() {
            match step.action {
                StepAction::WriteTest => match self.actions.write_test(task).await {
                    Ok(text) => {
                        certificate.test_written = true;
                        narration.push_str(&text);
                        narration.push('\n');
                    }
                    Err(err) => {
                        return WorkerOutcome::VerificationFailed {
                            certificate,
                            verification: Self::action_failure(&task.verification.command, err),
                        };
                    }
                },
                StepAction::Implement => match self.actions.write_implementation(task).await {
                    Ok(text) => {
                        certificate.implementation_written = true;
                        narration.push_str(&text);
                        narration.push('\n');
                    }
                    Err(err) => {
                        return WorkerOutcome::VerificationFailed {
                            certificate,
                            verification: Self::action_failure(&task.verification.command, err),
                        };
                    }
                },
                StepAction::VerifyFail | StepAction::VerifyPass | StepAction::Format | StepAction::Commit => {
                    let command = step.run.as_deref().unwrap_or(&task.verification.command);
                    let result = self
                        .verifier
                        .execute(command, task.verification.clamped_timeout_secs(), cwd)
                        .await;
                    if result.timed_out {
                        return WorkerOutcome::Timeout { verification: result };
                    }
                    if !step.verify.is_satisfied_by(result.exit_code) {
                        return WorkerOutcome::ProtocolViolation {
                            violation: ProtocolViolation::StepVerificationViolated { index },
                            certificate,
                            verification: Some(result),
                        };
                    }
                    match step.action {
                        StepAction::VerifyFail => certificate.test_failed_initially = true,
                        StepAction::VerifyPass => certificate.test_passed_finally = true,
                        _ => {}
                    }
                    last_verification = Some(result);
                }
            }
            self.touch_heartbeat();
        }

        let final_verification = match last_verification {
            Some(v) => v,
            None => self.verify(task, cwd).await,
        };
        self.accept_or_reject(certificate, narration, final_verification)
    }

    /// Shared gate applied at the end of either path: required bits, a
    /// passing final verification, and a clean forbidden-phrase scan (spec
    /// §8 properties 5 and 6).
    fn accept_or_reject(
        &self,
        certificate: TddCertificate,
        narration: String,
        final_verification: VerificationResult,
    ) -> WorkerOutcome {
        if !certificate.has_required_bits() {
            return WorkerOutcome::ProtocolViolation {
                violation: ProtocolViolation::MissingCertificateBits,
                certificate,
                verification: Some(final_verification),
            };
        }
        if let Some(phrase) = forbidden_phrase::first_match(&narration) {
            return WorkerOutcome::ProtocolViolation {
                violation: ProtocolViolation::ForbiddenPhrase(phrase.to_string()),
                certificate,
                verification: Some(final_verification),
            };
        }
        if !certificate.is_accepted(&final_verification) {
            return WorkerOutcome::VerificationFailed { certificate, verification: final_verification };
        }
        WorkerOutcome::Completed { certificate, verification: final_verification }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
