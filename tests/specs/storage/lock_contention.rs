//! Advisory feature lock (spec §4.4, §8 property 8 "single active
//! orchestrator per feature"): a second `zerg start` for a feature whose
//! lock is already held — and not yet stale — is refused outright rather
//! than racing the first run's dispatch loop.

use crate::support::*;
use serial_test::serial;
use std::time::{SystemTime, UNIX_EPOCH};

fn now_epoch_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before epoch").as_secs()
}

/// `#[serial]` because this writes a lock file directly rather than going
/// through a live orchestrator, and every other spec in this suite uses a
/// fresh tempdir-scoped root so ordinary tests don't need it.
#[test]
#[serial]
fn second_start_is_refused_while_the_first_holds_a_fresh_lock() {
    let mut fx = Fixture::new();
    fx.write_graph(&graph("contended", vec![task("T1.1", 1, &[], &marker_check("T1.1"), 5, false)]));

    let lock_path = fx.lock_path("contended");
    std::fs::create_dir_all(lock_path.parent().expect("lock dir")).expect("create lock dir");
    std::fs::write(&lock_path, format!("999999:{}", now_epoch_secs())).expect("write lock file");

    fx.zerg()
        .args(["start", "contended", "--test-cmd", WRITE_TEST_CMD, "--impl-cmd", WRITE_IMPL_CMD])
        .assert()
        .failure()
        .code(1);

    // The contended run must never have touched the state store.
    assert!(!fx.state_exists("contended"), "a refused start must not create a run record");
}

/// A lock written further in the past than the staleness horizon is
/// treated as abandoned and silently reclaimed (spec §4.4 "auto-heals
/// after the horizon").
#[test]
#[serial]
fn stale_lock_is_reclaimed_and_the_run_proceeds() {
    let mut fx = Fixture::new();
    fx.write_graph(&graph("healed", vec![task("T1.1", 1, &[], &marker_check("T1.1"), 5, false)]));

    let lock_path = fx.lock_path("healed");
    std::fs::create_dir_all(lock_path.parent().expect("lock dir")).expect("create lock dir");
    let ancient = now_epoch_secs().saturating_sub(3 * 60 * 60);
    std::fs::write(&lock_path, format!("999999:{ancient}")).expect("write stale lock file");

    fx.zerg()
        .args(["start", "healed", "--test-cmd", WRITE_TEST_CMD, "--impl-cmd", WRITE_IMPL_CMD])
        .assert()
        .success();

    let state = fx.read_state("healed");
    assert_eq!(state["state"], "complete");
}
