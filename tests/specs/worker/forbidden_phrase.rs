//! S6 — forbidden narration (spec §4.2, §7): a worker whose narration
//! contains a forbidden self-assessment phrase is rejected outright, even
//! though its verification already passed, and — per the normative text
//! of spec §7 ("a bug in the worker, not a transient fault") — is never
//! retried, unlike an ordinary failing verification.

use crate::support::*;

#[test]
fn narration_claiming_it_looks_good_is_rejected_and_never_retried() {
    let mut fx = Fixture::new();
    fx.write_graph(&graph("narrated", vec![task("T1.1", 1, &[], &marker_check("T1.1"), 5, false)]));

    // The Green step does real work (creates the marker, so verification
    // would otherwise pass) but narrates a forbidden phrase on stdout.
    let impl_cmd = r#"touch "marker-$ZERG_TASK_ID"; echo "I think it looks good""#;

    fx.zerg()
        .args(["start", "narrated", "--test-cmd", WRITE_TEST_CMD, "--impl-cmd", impl_cmd])
        .assert()
        .failure();

    let state = fx.read_state("narrated");
    assert_eq!(state["state"], "failed");
    assert_eq!(state["tasks"]["T1.1"]["status"], "failed");
    // A protocol violation is pinned straight to the retry budget ceiling
    // (default 3) rather than incrementing one attempt at a time: it is
    // rejected outright on its first and only attempt, never rescheduled.
    assert_eq!(
        state["tasks"]["T1.1"]["retry_count"], 3,
        "a forbidden-phrase rejection must be pinned to the retry budget ceiling, never rescheduled"
    );
    let transitions = state["tasks"]["T1.1"]["transitions"].as_array().expect("transitions");
    assert!(
        !transitions.iter().any(|t| t["status"] == "pending"),
        "a protocol violation must not produce any pending-reschedule transition"
    );

    let last_error = state["tasks"]["T1.1"]["last_error"].as_str().expect("last_error recorded");
    assert!(last_error.to_lowercase().contains("looks good") || last_error.to_lowercase().contains("forbidden"));

    let events = state["events"].as_array().expect("events array");
    assert!(events.iter().any(|e| e["kind"] == "protocol_violation" && e["task_id"] == "T1.1"));
}
