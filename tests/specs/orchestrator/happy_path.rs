//! S1 — happy path (spec §8): two independent level-1 tasks, two level-2
//! tasks depending on them, every verification passes. All four tasks
//! complete, both levels close in order, the run finishes `COMPLETE`.

use crate::support::*;

#[test]
fn four_task_two_level_graph_completes() {
    let mut fx = Fixture::new();
    fx.write_graph(&graph(
        "happy",
        vec![
            task("T1.1", 1, &[], &marker_check("T1.1"), 5, false),
            task("T1.2", 1, &[], &marker_check("T1.2"), 5, false),
            task("T2.1", 2, &["T1.1"], &marker_check("T2.1"), 5, false),
            task("T2.2", 2, &["T1.1", "T1.2"], &marker_check("T2.2"), 5, false),
        ],
    ));

    fx.zerg()
        .args(["start", "happy", "--workers", "5", "--test-cmd", WRITE_TEST_CMD, "--impl-cmd", WRITE_IMPL_CMD])
        .assert()
        .success();

    let state = fx.read_state("happy");
    assert_eq!(state["state"], "complete");
    assert_eq!(state["totals"]["completed"], 4);
    assert_eq!(state["totals"]["failed"], 0);

    for id in ["T1.1", "T1.2", "T2.1", "T2.2"] {
        assert_eq!(state["tasks"][id]["status"], "complete", "task {id} should be complete");
    }
}

#[test]
fn status_reports_complete_levels_after_the_run() {
    let mut fx = Fixture::new();
    fx.write_graph(&graph(
        "happy-status",
        vec![
            task("A", 1, &[], &marker_check("A"), 5, false),
            task("B", 2, &["A"], &marker_check("B"), 5, false),
        ],
    ));

    fx.zerg()
        .args(["start", "happy-status", "--test-cmd", WRITE_TEST_CMD, "--impl-cmd", WRITE_IMPL_CMD])
        .assert()
        .success();

    let assert = fx.zerg().args(["status", "happy-status", "--json"]).assert().success();
    let output = assert.get_output();
    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).expect("status emits JSON");
    assert_eq!(snapshot["state"], "complete");
    assert_eq!(snapshot["levels"]["1"]["complete"], 1);
    assert_eq!(snapshot["levels"]["2"]["complete"], 1);
}
