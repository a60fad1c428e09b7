// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn task_id_round_trips_through_serde() {
    let id = TaskId::from_string("T1.1");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"T1.1\"");
    let back: TaskId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn verification_contract_clamps_timeout_to_build_ceiling() {
    let contract = VerificationContract::with_timeout("make build", 10_000);
    assert_eq!(contract.clamped_timeout_secs(), VerificationContract::MAX_TIMEOUT_SECS);
}

#[test]
fn verification_contract_default_timeout_is_sixty_seconds() {
    let contract = VerificationContract::new("pytest -q");
    assert_eq!(contract.timeout_secs, 60);
}

#[test]
fn verify_mode_exit_code_nonzero_is_satisfied_by_failure() {
    assert!(VerifyMode::ExitCodeNonzero.is_satisfied_by(1));
    assert!(!VerifyMode::ExitCodeNonzero.is_satisfied_by(0));
}

#[test]
fn verify_mode_exit_code_is_satisfied_only_by_zero() {
    assert!(VerifyMode::ExitCode.is_satisfied_by(0));
    assert!(!VerifyMode::ExitCode.is_satisfied_by(1));
}

#[test]
fn verify_mode_none_is_always_satisfied() {
    assert!(VerifyMode::None.is_satisfied_by(1));
    assert!(VerifyMode::None.is_satisfied_by(0));
}

#[test]
fn task_builder_produces_task_with_dependencies() {
    let dep = TaskId::from_string("T1.1");
    let task = Task::builder()
        .id("T2.1")
        .title("wire up the client")
        .level(2)
        .dependencies([dep].into_iter().collect())
        .build();
    assert_eq!(task.level, 2);
    assert!(task.dependencies.contains(&dep));
}

#[test]
fn step_action_display_matches_wire_format() {
    assert_eq!(StepAction::WriteTest.to_string(), "write_test");
    assert_eq!(StepAction::VerifyFail.to_string(), "verify_fail");
    assert_eq!(StepAction::Commit.to_string(), "commit");
}
