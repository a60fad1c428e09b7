// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The explicit configuration/context threaded through the orchestrator's
//! constructor (spec §9 re-architecture note: "process-wide singletons ->
//! explicit context").

use std::path::{Path, PathBuf};
use zerg_storage::DEFAULT_STALENESS_HORIZON_SECS;

/// Default worker pool size (spec §5).
pub const DEFAULT_WORKER_COUNT: usize = 5;

/// Default per-run retry budget, including the first attempt (spec §4.1).
pub const DEFAULT_RETRY_BUDGET: u32 = 3;

/// A crashed worker's heartbeat is considered stale after this many
/// multiples of the worst-case TDD step duration (spec §9: "staleness = 3x
/// max step time"). Expressed here as a standalone default in
/// milliseconds; call sites that know a task's own step timings may
/// override it.
pub const DEFAULT_HEARTBEAT_STALENESS_MS: u64 = 3 * 60_000;

/// Environment roots and policy knobs for one orchestrator instance.
/// Constructed fresh per run (tests build one with a `tempdir`); no global
/// statics.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub worker_count: usize,
    pub retry_budget: u32,
    pub lock_staleness_horizon_secs: u64,
    pub heartbeat_staleness_ms: u64,
    pub state_root: PathBuf,
    pub log_root: PathBuf,
    pub lock_root: PathBuf,
}

impl OrchestratorConfig {
    /// Lay out `state/`, `logs/`, and `locks/` under `root`, the way
    /// `oj-daemon`'s `env.rs` derives its directory layout from a single
    /// base path.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            retry_budget: DEFAULT_RETRY_BUDGET,
            lock_staleness_horizon_secs: DEFAULT_STALENESS_HORIZON_SECS,
            heartbeat_staleness_ms: DEFAULT_HEARTBEAT_STALENESS_MS,
            state_root: root.join("state"),
            log_root: root.join("logs"),
            lock_root: root.join("locks"),
        }
    }

    pub fn with_worker_count(mut self, n: usize) -> Self {
        self.worker_count = n.max(1);
        self
    }

    pub fn with_retry_budget(mut self, n: u32) -> Self {
        self.retry_budget = n.max(1);
        self
    }
}
