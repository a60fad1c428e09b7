//! CLI exit code contract (spec §6: "0 success; 1 recoverable failure;
//! 2 usage error; 130 operator interrupt").

use crate::support::*;
use predicates::prelude::*;

#[test]
fn missing_graph_argument_is_a_usage_error() {
    let fx = Fixture::new();
    fx.zerg_std()
        .args(["start", "whatever", "--test-cmd", "true", "--impl-cmd", "true"])
        // `--graph` omitted entirely: clap rejects this before any
        // orchestrator is ever constructed.
        .assert()
        .failure()
        .code(2);
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let fx = Fixture::new();
    fx.zerg().args(["frobnicate", "whatever"]).assert().failure().code(2);
}

#[test]
fn graph_for_a_different_feature_is_a_recoverable_failure() {
    let mut fx = Fixture::new();
    fx.write_graph(&graph("actual-feature", vec![task("T1.1", 1, &[], "true", 5, false)]));

    fx.zerg()
        .args(["start", "requested-feature", "--test-cmd", "true", "--impl-cmd", "true"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("requested-feature"));
}

#[test]
fn successful_run_exits_zero() {
    let mut fx = Fixture::new();
    fx.write_graph(&graph("clean", vec![task("T1.1", 1, &[], &marker_check("T1.1"), 5, false)]));

    fx.zerg()
        .args(["start", "clean", "--test-cmd", WRITE_TEST_CMD, "--impl-cmd", WRITE_IMPL_CMD])
        .assert()
        .success()
        .code(0);
}

#[test]
fn permanently_failing_run_exits_one() {
    let mut fx = Fixture::new();
    fx.write_graph(&graph("doomed-exit", vec![task("T1.1", 1, &[], "exit 1", 5, false)]));

    fx.zerg()
        .args(["start", "doomed-exit", "--test-cmd", WRITE_TEST_CMD, "--impl-cmd", WRITE_IMPL_CMD])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn status_for_a_never_started_feature_is_a_recoverable_failure() {
    let mut fx = Fixture::new();
    fx.write_graph(&graph("never-started", vec![task("T1.1", 1, &[], "true", 5, false)]));

    fx.zerg().args(["status", "never-started"]).assert().failure().code(1);
}
