//! S4 — permanent failure (spec §8): a task whose verification never
//! passes exhausts its retry budget, level 1 never closes, the run ends
//! `FAILED`, and no level-2 task is ever claimed.

use crate::support::*;

#[test]
fn exhausted_retry_budget_fails_the_run_without_touching_the_next_level() {
    let mut fx = Fixture::new();
    fx.write_graph(&graph(
        "doomed",
        vec![
            task("T1.1", 1, &[], "exit 1", 5, false),
            task("T2.1", 2, &["T1.1"], &marker_check("T2.1"), 5, false),
        ],
    ));

    fx.zerg()
        .args(["start", "doomed", "--test-cmd", WRITE_TEST_CMD, "--impl-cmd", WRITE_IMPL_CMD])
        .assert()
        .failure();

    let state = fx.read_state("doomed");
    assert_eq!(state["state"], "failed");
    assert_eq!(state["tasks"]["T1.1"]["status"], "failed");
    // Default retry budget is 3 attempts including the first: two
    // reschedules before the budget is exhausted.
    assert_eq!(state["tasks"]["T1.1"]["retry_count"], 2);
    assert_eq!(state["tasks"]["T2.1"]["status"], "pending");

    let events = state["events"].as_array().expect("events array");
    assert!(
        !events.iter().any(|e| e["kind"] == "task_dispatched" && e["task_id"] == "T2.1"),
        "T2.1 must never be dispatched while level 1 cannot close"
    );
}
