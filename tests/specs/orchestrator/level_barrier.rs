//! S2 — level-barrier hold (spec §8): a level-2 task that depends on a
//! slow level-1 task must not be dispatched before that level-1 task
//! completes, even though a sibling level-1 task finishes immediately.

use crate::support::*;

#[test]
fn dependent_level_two_task_is_not_dispatched_before_its_slow_dependency_completes() {
    let mut fx = Fixture::new();
    fx.write_graph(&graph(
        "barrier",
        vec![
            task("T1.1", 1, &[], &marker_check("T1.1"), 1, false),
            task("T1.2", 1, &[], &marker_check("T1.2"), 1, false),
            task("T2.1", 2, &["T1.1"], &marker_check("T2.1"), 1, false),
            task("T2.2", 2, &["T1.1", "T1.2"], &marker_check("T2.2"), 1, false),
        ],
    ));

    // T1.2's Green step sleeps before creating its marker; every other
    // task's Green step creates its marker immediately.
    let impl_cmd = r#"if [ "$ZERG_TASK_ID" = "T1.2" ]; then sleep 1; fi; touch "marker-$ZERG_TASK_ID""#;

    fx.zerg()
        .args(["start", "barrier", "--workers", "5", "--test-cmd", WRITE_TEST_CMD, "--impl-cmd", impl_cmd])
        .assert()
        .success();

    let state = fx.read_state("barrier");
    assert_eq!(state["state"], "complete");

    let events = state["events"].as_array().expect("events array");
    let completed_at = |id: &str| {
        events
            .iter()
            .find(|e| e["kind"] == "task_completed" && e["task_id"] == id)
            .unwrap_or_else(|| panic!("no task_completed event for {id}"))["at_epoch_ms"]
            .as_u64()
            .unwrap()
    };
    let dispatched_at = |id: &str| {
        events
            .iter()
            .find(|e| e["kind"] == "task_dispatched" && e["task_id"] == id)
            .unwrap_or_else(|| panic!("no task_dispatched event for {id}"))["at_epoch_ms"]
            .as_u64()
            .unwrap()
    };

    let t12_completed = completed_at("T1.2");

    // The barrier applies to every level-2 task, not only T2.2 whose
    // dependency is the slow one: level 1 as a whole must close (every
    // level-1 task terminal) before level 2 opens at all (spec §8
    // property 1).
    for id in ["T2.1", "T2.2"] {
        let dispatched = dispatched_at(id);
        assert!(
            dispatched >= t12_completed,
            "{id} dispatched at {dispatched} before level 1 fully closed at {t12_completed}"
        );
    }
}
