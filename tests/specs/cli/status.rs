//! `zerg status` (spec §8 property 9 "status is a pure read"): repeated
//! invocations against an unchanged checkpoint return byte-identical JSON
//! and never touch the state file.

use crate::support::*;
use similar_asserts::assert_eq;

#[test]
fn repeated_status_calls_are_idempotent_and_never_mutate_the_checkpoint() {
    let mut fx = Fixture::new();
    fx.write_graph(&graph(
        "steady",
        vec![
            task("T1.1", 1, &[], &marker_check("T1.1"), 5, false),
            task("T2.1", 2, &["T1.1"], &marker_check("T2.1"), 5, false),
        ],
    ));

    fx.zerg()
        .args(["start", "steady", "--test-cmd", WRITE_TEST_CMD, "--impl-cmd", WRITE_IMPL_CMD])
        .assert()
        .success();

    let before_mtime = std::fs::metadata(fx.state_path("steady")).expect("state metadata").modified().expect("mtime");

    let first = fx.zerg().args(["status", "steady", "--json"]).assert().success();
    let first_json: serde_json::Value =
        serde_json::from_slice(&first.get_output().stdout).expect("status emits JSON");

    // A couple of wall-clock ticks, in case an accidental write would bump
    // the mtime's resolution past what an immediate re-stat might miss.
    std::thread::sleep(std::time::Duration::from_millis(20));

    let second = fx.zerg().args(["status", "steady", "--json"]).assert().success();
    let second_json: serde_json::Value =
        serde_json::from_slice(&second.get_output().stdout).expect("status emits JSON");

    assert_eq!(first_json, second_json);

    let after_mtime = std::fs::metadata(fx.state_path("steady")).expect("state metadata").modified().expect("mtime");
    assert_eq!(before_mtime, after_mtime, "status must not write to the state file");
}

#[test]
fn status_level_filter_narrows_the_snapshot() {
    let mut fx = Fixture::new();
    fx.write_graph(&graph(
        "narrowed",
        vec![
            task("T1.1", 1, &[], &marker_check("T1.1"), 5, false),
            task("T2.1", 2, &["T1.1"], &marker_check("T2.1"), 5, false),
        ],
    ));

    fx.zerg()
        .args(["start", "narrowed", "--test-cmd", WRITE_TEST_CMD, "--impl-cmd", WRITE_IMPL_CMD])
        .assert()
        .success();

    let assert = fx.zerg().args(["status", "narrowed", "--level", "1", "--json"]).assert().success();
    let snapshot: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).expect("status JSON");
    let levels = snapshot["levels"].as_object().expect("levels map");
    assert!(levels.contains_key("1"));
    assert!(!levels.contains_key("2"), "--level 1 must exclude level 2 from the snapshot");
}
