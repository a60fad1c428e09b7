// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Orchestrator (spec §4.1): the finite-state supervisor that drives
//! one feature's task graph through its level barrier, dispatching ready
//! tasks to a bounded pool and checkpointing every transition before it is
//! acknowledged.
//!
//! Workers are modeled as spawned async tasks running a
//! [`TddProtocolRunner`] rather than separate OS processes (spec §9 open
//! question "workers are OS processes"): the code-authoring seam is already
//! abstracted behind [`TaskActions`], so a real deployment's worker is
//! whatever that trait's implementor does, in-process or out. Crash
//! recovery is unaffected either way — it is keyed off a stale checkpoint,
//! not process liveness.

use crate::config::OrchestratorConfig;
use crate::decision;
use crate::error::OrchestratorError;
use crate::level_merge::{LevelMergeHook, NoopLevelMergeHook};
use crate::status::{self, StatusSnapshot};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use zerg_core::clock::{Clock, SystemClock};
use zerg_core::run::{RunEvent, RunRecord, RunState};
use zerg_core::task::{Task, TaskId};
use zerg_core::task_exec::{TaskExecutionRecord, TaskStatus};
use zerg_core::worker::{WorkerId, WorkerRecord};
use zerg_eventlog::{EventLevel, EventLogWriter, EventOrigin, EventRecord};
use zerg_graph::TaskGraph;
use zerg_storage::{AdvisoryLock, StateStore};
use zerg_worker::{TaskActions, TddProtocolRunner, VerificationExecutor, WorkerOutcome};

/// How long the dispatch loop sleeps between polls while paused or waiting
/// on a run with no currently-pending and no currently in-flight work.
const IDLE_POLL: Duration = Duration::from_millis(50);

struct Inner<C: Clock> {
    config: OrchestratorConfig,
    feature: String,
    graph: TaskGraph,
    workdir: PathBuf,
    task_levels: HashMap<String, u32>,
    store: StateStore,
    lock: AdvisoryLock,
    clock: C,
    actions: Arc<dyn TaskActions>,
    verifier: Arc<dyn VerificationExecutor>,
    merge_hook: Arc<dyn LevelMergeHook>,
    orchestrator_log: EventLogWriter,
    /// The run currently owned by this instance, populated once `start()`
    /// begins. `None` for an instance only ever used for operator commands
    /// against a run started by another process — those commands fall back
    /// to loading the persisted record directly.
    record: Mutex<Option<RunRecord>>,
}

/// One feature run. Cheap to clone: every clone shares the same underlying
/// state via `Arc`, which is how `pause`/`resume`/`stop`/`retry_task` reach
/// a `start()` loop driven concurrently by another clone (spec §6 operator
/// commands acting on a run already in flight, within the same process —
/// across processes the same effect is reached through the checkpointed
/// state store instead).
#[derive(Clone)]
pub struct Orchestrator<C: Clock = SystemClock> {
    inner: Arc<Inner<C>>,
}

impl<C: Clock + 'static> Orchestrator<C> {
    /// Construct an orchestrator for `feature`, driving `graph` and running
    /// verification commands rooted at `workdir`, with no level-merge
    /// collaborator.
    pub fn new(
        config: OrchestratorConfig,
        feature: impl Into<String>,
        graph: TaskGraph,
        workdir: impl Into<PathBuf>,
        actions: Arc<dyn TaskActions>,
        verifier: Arc<dyn VerificationExecutor>,
        clock: C,
    ) -> Result<Self, OrchestratorError> {
        Self::with_merge_hook(
            config,
            feature,
            graph,
            workdir,
            actions,
            verifier,
            Arc::new(NoopLevelMergeHook),
            clock,
        )
    }

    /// As [`Self::new`], but with an explicit level-merge hook (spec §9
    /// "pluggable post-level hook").
    #[allow(clippy::too_many_arguments)]
    pub fn with_merge_hook(
        config: OrchestratorConfig,
        feature: impl Into<String>,
        graph: TaskGraph,
        workdir: impl Into<PathBuf>,
        actions: Arc<dyn TaskActions>,
        verifier: Arc<dyn VerificationExecutor>,
        merge_hook: Arc<dyn LevelMergeHook>,
        clock: C,
    ) -> Result<Self, OrchestratorError> {
        let feature = feature.into();
        let store = StateStore::open(&config.state_root)?;
        let lock = AdvisoryLock::new(&config.lock_root)
            .with_staleness_horizon_secs(config.lock_staleness_horizon_secs);
        let orchestrator_log = EventLogWriter::open(&config.log_root, &EventOrigin::Orchestrator)?;
        let task_levels = graph.tasks().map(|t| (t.id.as_str().to_string(), t.level)).collect();
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                feature,
                graph,
                workdir: workdir.into(),
                task_levels,
                store,
                lock,
                clock,
                actions,
                verifier,
                merge_hook,
                orchestrator_log,
                record: Mutex::new(None),
            }),
        })
    }

    pub fn feature(&self) -> &str {
        &self.inner.feature
    }

    fn now_ms(&self) -> u64 {
        self.inner.clock.epoch_ms()
    }

    fn now_secs(&self) -> u64 {
        self.now_ms() / 1000
    }

    fn log_event(
        &self,
        level: EventLevel,
        kind: &str,
        message: impl Into<String>,
        task_id: Option<TaskId>,
    ) {
        let mut record = EventRecord::new(chrono::Utc::now(), level, EventOrigin::Orchestrator, kind, message);
        if let Some(id) = task_id {
            record = record.with_task_id(id);
        }
        if let Err(err) = self.inner.orchestrator_log.append(&record) {
            tracing::warn!(feature = %self.inner.feature, error = %err, "failed to append orchestrator event");
        }
    }

    /// Pull `paused`/`stop_requested`/`stop_force` from the persisted
    /// checkpoint into the live in-memory record, without disturbing
    /// anything else it tracks. A `pause`/`resume`/`stop` invoked from a
    /// separate operator process only ever reaches this run through the
    /// state store (spec §5 "the state file is the only shared mutable
    /// resource"); without this the dispatch loop would only ever observe
    /// control requests issued by a clone sharing this instance's own
    /// `Arc`, i.e. only from within the same process.
    fn sync_control_flags(&self) -> Result<(), OrchestratorError> {
        let Some(persisted) = self.inner.store.load(&self.inner.feature)? else {
            return Ok(());
        };
        let mut guard = self.inner.record.lock();
        if let Some(record) = guard.as_mut() {
            record.paused = persisted.paused;
            record.stop_requested = persisted.stop_requested;
            record.stop_force = persisted.stop_force;
        }
        Ok(())
    }

    /// Keep the checkpointed `state` field honest while this process owns
    /// the dispatch loop: `pause`/`resume` only ever flip the `paused` flag
    /// from their own (disk-only) view of the record, so without this the
    /// `state` a concurrent `zerg status` reads would go stale the next
    /// time this loop's own in-memory record gets checkpointed.
    fn reflect_run_state(&self, state: RunState) -> Result<(), OrchestratorError> {
        let mut guard = self.inner.record.lock();
        let Some(record) = guard.as_mut() else {
            return Ok(());
        };
        if record.state == state {
            return Ok(());
        }
        record.state = state;
        self.inner.store.save(&self.inner.feature, record)?;
        Ok(())
    }

    /// Keep the checkpointed `current_level` honest as the barrier advances,
    /// so a concurrent `zerg status` reflects the level actually in flight
    /// rather than the level the run started at (spec §4.1 "Status
    /// contract": "current level").
    fn reflect_current_level(&self, level: u32) -> Result<(), OrchestratorError> {
        let mut guard = self.inner.record.lock();
        let Some(record) = guard.as_mut() else {
            return Ok(());
        };
        if record.current_level == level {
            return Ok(());
        }
        record.current_level = level;
        self.inner.store.save(&self.inner.feature, record)?;
        Ok(())
    }

    fn is_stop_requested(&self) -> bool {
        self.inner.record.lock().as_ref().map(|r| r.stop_requested).unwrap_or(false)
    }

    fn is_stop_forced(&self) -> bool {
        self.inner.record.lock().as_ref().map(|r| r.stop_force).unwrap_or(false)
    }

    fn is_paused(&self) -> bool {
        self.inner.record.lock().as_ref().map(|r| r.paused).unwrap_or(false)
    }

    /// Load a persisted run when resuming, else start fresh with every
    /// graph task pending at the graph's lowest level (spec §4.1 `start`).
    fn load_or_init(&self, resume: bool) -> Result<RunRecord, OrchestratorError> {
        if resume {
            if let Some(record) = self.inner.store.load(&self.inner.feature)? {
                return Ok(record);
            }
        }
        let mut record = RunRecord::new(self.inner.feature.clone());
        record.current_level = self.inner.graph.min_level().unwrap_or(1);
        for task in self.inner.graph.tasks() {
            record.tasks.insert(task.id.as_str().to_string(), TaskExecutionRecord::new(task.id));
        }
        Ok(record)
    }

    /// Revert any `claimed`/`in_progress` task inherited from a prior
    /// checkpoint (spec §4.1 "Crash recovery"): a freshly started
    /// orchestrator process has no live worker of its own, so any
    /// non-terminal task it inherits is orphaned by construction. This
    /// implementation's resolution of the retry-budget open question (see
    /// DESIGN.md) is that a crash reversion does not consume retry budget.
    fn recover_crashed_tasks(&self, record: &mut RunRecord) {
        let now = self.now_ms();
        let needing_recovery = decision::tasks_needing_recovery(&record.tasks);
        for task_id in needing_recovery {
            if let Some(exec) = record.tasks.get_mut(task_id.as_str()) {
                exec.revert_for_crash_recovery(now, false);
            }
            record.push_event(RunEvent {
                at_epoch_ms: now,
                kind: "task_recovered".to_string(),
                message: format!("task {task_id} reverted to pending after crash recovery"),
                task_id: Some(task_id),
            });
        }
        record.workers.clear();
    }

    /// Run the full level-barrier dispatch loop for this feature until it
    /// reaches a terminal [`RunState`] (spec §4.1 steps 1-6). Acquires the
    /// advisory feature lock for the duration of the run.
    pub async fn start(&self, resume: bool) -> Result<RunState, OrchestratorError> {
        self.inner.lock.acquire(&self.inner.feature, self.now_secs())?;
        let outcome = self.run_inner(resume).await;
        if let Err(err) = self.inner.lock.release(&self.inner.feature) {
            tracing::warn!(feature = %self.inner.feature, error = %err, "failed to release advisory lock");
        }
        outcome
    }

    #[allow(clippy::expect_used)]
    async fn run_inner(&self, resume: bool) -> Result<RunState, OrchestratorError> {
        let mut record = self.load_or_init(resume)?;
        if resume {
            self.recover_crashed_tasks(&mut record);
        }
        record.state = RunState::Running;
        record.paused = false;
        record.stop_requested = false;
        record.stop_force = false;
        self.inner.store.save(&self.inner.feature, &record)?;
        *self.inner.record.lock() = Some(record);
        self.log_event(
            EventLevel::Info,
            "run_started",
            format!("run started for feature {:?} (resume={resume})", self.inner.feature),
            None,
        );

        loop {
            self.sync_control_flags()?;
            if self.is_stop_requested() {
                return self.finish_stop().await;
            }

            let level = {
                let guard = self.inner.record.lock();
                decision::current_level(&self.inner.graph, &guard.as_ref().expect("record initialized").tasks)
            };
            let Some(level) = level else {
                return self.finish(RunState::Complete).await;
            };
            self.reflect_current_level(level)?;

            if self.is_paused() {
                self.reflect_run_state(RunState::Paused)?;
                tokio::time::sleep(IDLE_POLL).await;
                continue;
            }
            self.reflect_run_state(RunState::Running)?;

            self.run_level(level).await?;

            if self.is_stop_requested() {
                return self.finish_stop().await;
            }

            let permanent_failure = {
                let guard = self.inner.record.lock();
                decision::level_has_permanent_failure(
                    &self.inner.graph,
                    &guard.as_ref().expect("record initialized").tasks,
                    level,
                    self.inner.config.retry_budget,
                )
            };
            if permanent_failure {
                return self.finish(RunState::Failed).await;
            }

            if let Err(merge_err) = self.inner.merge_hook.merge_level(&self.inner.feature, level).await {
                tracing::error!(feature = %self.inner.feature, level, error = %merge_err, "level merge failed");
                let now = self.now_ms();
                let mut guard = self.inner.record.lock();
                let record = guard.as_mut().expect("record initialized");
                record.global_error = Some(merge_err.to_string());
                record.push_event(RunEvent {
                    at_epoch_ms: now,
                    kind: "level_merge_failed".to_string(),
                    message: merge_err.to_string(),
                    task_id: None,
                });
                self.inner.store.save(&self.inner.feature, record)?;
                drop(guard);
                return self.finish(RunState::Failed).await;
            }
        }
    }

    /// Drive one level to closure: dispatch pending tasks up to the pool's
    /// capacity, apply each completion, and retry retry-eligible failures,
    /// until every task at `level` is terminal and none remain in flight
    /// (spec §4.1 step 4, §5).
    #[allow(clippy::expect_used)]
    async fn run_level(&self, level: u32) -> Result<(), OrchestratorError> {
        let tasks_at_level = self.inner.graph.tasks_at_level(level);
        let mut in_flight: JoinSet<(TaskId, WorkerId, WorkerOutcome)> = JoinSet::new();

        loop {
            self.sync_control_flags()?;
            if self.is_stop_requested() {
                while let Some(joined) = in_flight.join_next().await {
                    self.apply_join_result(joined)?;
                }
                return Ok(());
            }

            let closed = {
                let guard = self.inner.record.lock();
                decision::level_is_closed(&self.inner.graph, &guard.as_ref().expect("record initialized").tasks, level)
            };
            if closed && in_flight.is_empty() {
                return Ok(());
            }

            if self.is_paused() {
                self.reflect_run_state(RunState::Paused)?;
            } else {
                self.reflect_run_state(RunState::Running)?;
                if in_flight.len() < self.inner.config.worker_count {
                    if let Some((task, worker_id)) = self.claim_next(&tasks_at_level)? {
                        self.spawn_task(task, worker_id, &mut in_flight);
                        continue;
                    }
                }
            }

            if in_flight.is_empty() {
                tokio::time::sleep(IDLE_POLL).await;
                continue;
            }

            if let Some(joined) = in_flight.join_next().await {
                self.apply_join_result(joined)?;
            }
        }
    }

    /// Claim the next tie-broken pending task at this level, if any, and
    /// checkpoint the claim before handing it off (spec §4.1 "transition it
    /// to `claimed`, dispatch to a worker").
    #[allow(clippy::expect_used)]
    fn claim_next(&self, tasks_at_level: &[&Task]) -> Result<Option<(Task, WorkerId)>, OrchestratorError> {
        let now = self.now_ms();
        let claimed = {
            let mut guard = self.inner.record.lock();
            let record = guard.as_mut().expect("record initialized");
            let order = decision::pending_dispatch_order(tasks_at_level, &record.tasks);
            let Some(&task) = order.first() else { return Ok(None) };
            let task = task.clone();
            let worker_id = WorkerId::new();
            if let Some(exec) = record.tasks.get_mut(task.id.as_str()) {
                exec.transition(TaskStatus::Claimed, now);
                exec.owner = Some(worker_id);
                exec.transition(TaskStatus::InProgress, now);
            }
            record.workers.insert(worker_id.to_string(), WorkerRecord::new(worker_id, task.id, None, now));
            record.push_event(RunEvent {
                at_epoch_ms: now,
                kind: "task_dispatched".to_string(),
                message: format!("dispatched {} to {worker_id}", task.id),
                task_id: Some(task.id),
            });
            self.inner.store.save(&self.inner.feature, record)?;
            (task, worker_id)
        };
        self.log_event(
            EventLevel::Info,
            "task_dispatched",
            format!("dispatched {} to {}", claimed.0.id, claimed.1),
            Some(claimed.0.id),
        );
        Ok(Some(claimed))
    }

    /// Spawn `task`'s TDD protocol run as an async task in the pool. The
    /// spawned future owns cloned `Arc`s of the authoring/verification
    /// seams, independent of this orchestrator's own lifetime.
    fn spawn_task(&self, task: Task, worker_id: WorkerId, in_flight: &mut JoinSet<(TaskId, WorkerId, WorkerOutcome)>) {
        let actions = Arc::clone(&self.inner.actions);
        let verifier = Arc::clone(&self.inner.verifier);
        let workdir = self.inner.workdir.clone();
        let task_id = task.id;
        let orchestrator = self.clone();
        in_flight.spawn(async move {
            let heartbeat = || orchestrator.touch_worker_heartbeat(worker_id);
            let runner = TddProtocolRunner::new(actions.as_ref(), verifier.as_ref()).with_heartbeat(&heartbeat);
            let outcome = runner.run(&task, &workdir).await;
            (task_id, worker_id, outcome)
        });
    }

    /// Touch a worker's heartbeat and checkpoint it (spec §9 "heartbeat
    /// granularity": "workers touch a per-worker timestamp at each TDD
    /// step"). Invoked by the spawned [`TddProtocolRunner`] after each
    /// protocol step. This process never consults its own workers'
    /// heartbeats for recovery decisions (see `decision::tasks_needing_recovery`);
    /// the persisted timestamp exists so `get_status` can flag a worker as
    /// stale for an operator, and so a later process resuming this feature
    /// has an accurate `started_at`/`last_heartbeat` history on disk.
    fn touch_worker_heartbeat(&self, worker_id: WorkerId) {
        let now = self.now_ms();
        let mut guard = self.inner.record.lock();
        let Some(record) = guard.as_mut() else { return };
        let Some(worker) = record.workers.get_mut(worker_id.as_str()) else { return };
        worker.touch_heartbeat(now);
        if let Err(err) = self.inner.store.save(&self.inner.feature, record) {
            tracing::warn!(feature = %self.inner.feature, worker = %worker_id, error = %err, "failed to checkpoint worker heartbeat");
        }
    }

    fn apply_join_result(
        &self,
        joined: Result<(TaskId, WorkerId, WorkerOutcome), tokio::task::JoinError>,
    ) -> Result<(), OrchestratorError> {
        let (task_id, worker_id, outcome) =
            joined.map_err(|err| OrchestratorError::WorkerPanicked(err.to_string()))?;
        self.apply_outcome(task_id, worker_id, outcome)
    }

    /// Apply one worker's [`WorkerOutcome`] to the run record: transition
    /// the task, update totals, schedule a retry when eligible and budget
    /// remains, and checkpoint before returning (spec §4.1 step 3, §7).
    #[allow(clippy::expect_used)]
    fn apply_outcome(&self, task_id: TaskId, worker_id: WorkerId, outcome: WorkerOutcome) -> Result<(), OrchestratorError> {
        let now = self.now_ms();
        let retry_budget = self.inner.config.retry_budget;
        let mut guard = self.inner.record.lock();
        let record = guard.as_mut().expect("record initialized");
        record.workers.remove(&worker_id.to_string());

        let (kind, message) = if let Some(exec) = record.tasks.get_mut(task_id.as_str()) {
            match &outcome {
                WorkerOutcome::Completed { .. } => {
                    exec.transition(TaskStatus::Complete, now);
                    exec.last_error = None;
                    record.totals.completed += 1;
                    ("task_completed".to_string(), format!("task {task_id} completed"))
                }
                WorkerOutcome::ProtocolViolation { violation, .. } => {
                    exec.transition(TaskStatus::Failed, now);
                    exec.last_error = Some(violation.to_string());
                    // Protocol violations are never retried (spec §7: "a bug
                    // in the worker, not a transient fault"). `decision`'s
                    // permanent-failure check is a pure budget comparison
                    // over `retry_count`, so pin it at the budget ceiling
                    // here rather than teaching that check about outcome
                    // kinds.
                    exec.retry_count = exec.retry_count.max(retry_budget);
                    record.totals.failed += 1;
                    ("protocol_violation".to_string(), format!("task {task_id} rejected: {violation}"))
                }
                WorkerOutcome::VerificationFailed { verification, .. } => {
                    exec.last_error = Some(format!("verification exited {}", verification.exit_code));
                    exec.last_transcript = Some(verification.transcript.clone());
                    exec.transition(TaskStatus::Failed, now);
                    if decision::should_retry(exec, retry_budget) {
                        exec.schedule_retry(now);
                        record.totals.retried += 1;
                        ("task_retry_scheduled".to_string(), format!("task {task_id} failed verification; retry scheduled"))
                    } else {
                        record.totals.failed += 1;
                        ("task_failed".to_string(), format!("task {task_id} exhausted its retry budget"))
                    }
                }
                WorkerOutcome::Timeout { verification } => {
                    exec.last_error = Some("verification timed out".to_string());
                    exec.last_transcript = Some(verification.transcript.clone());
                    exec.transition(TaskStatus::Failed, now);
                    if decision::should_retry(exec, retry_budget) {
                        exec.schedule_retry(now);
                        record.totals.retried += 1;
                        ("task_retry_scheduled".to_string(), format!("task {task_id} timed out; retry scheduled"))
                    } else {
                        record.totals.failed += 1;
                        ("task_failed".to_string(), format!("task {task_id} exhausted its retry budget after timing out"))
                    }
                }
            }
        } else {
            ("unknown_task".to_string(), format!("outcome reported for unknown task {task_id}"))
        };

        record.push_event(RunEvent { at_epoch_ms: now, kind: kind.clone(), message: message.clone(), task_id: Some(task_id) });
        self.inner.store.save(&self.inner.feature, record)?;
        drop(guard);

        let level = if outcome.is_success() { EventLevel::Info } else { EventLevel::Warn };
        self.log_event(level, &kind, message, Some(task_id));
        Ok(())
    }

    #[allow(clippy::expect_used)]
    async fn finish(&self, state: RunState) -> Result<RunState, OrchestratorError> {
        let now = self.now_ms();
        let reached = {
            let mut guard = self.inner.record.lock();
            let record = guard.as_mut().expect("record initialized");
            record.state = state;
            record.push_event(RunEvent {
                at_epoch_ms: now,
                kind: "run_finished".to_string(),
                message: format!("run entered terminal state {state}"),
                task_id: None,
            });
            self.inner.store.save(&self.inner.feature, record)?;
            record.state
        };
        self.log_event(
            EventLevel::Info,
            "run_finished",
            format!("run for feature {:?} finished: {reached}", self.inner.feature),
            None,
        );
        Ok(reached)
    }

    /// Finish a requested stop (spec §6 `stop`): when forced, any task still
    /// `claimed`/`in_progress` at the moment of drain is marked `stale`
    /// rather than left dangling; a non-forced stop only runs after
    /// `run_level` has already drained every in-flight task naturally.
    #[allow(clippy::expect_used)]
    async fn finish_stop(&self) -> Result<RunState, OrchestratorError> {
        if self.is_stop_forced() {
            let now = self.now_ms();
            let mut guard = self.inner.record.lock();
            let record = guard.as_mut().expect("record initialized");
            for exec in record.tasks.values_mut() {
                if matches!(exec.status, TaskStatus::Claimed | TaskStatus::InProgress) {
                    exec.transition(TaskStatus::Stale, now);
                }
            }
            self.inner.store.save(&self.inner.feature, record)?;
        }
        self.finish(RunState::Stopped).await
    }

    /// Mutate the run record and checkpoint it before returning, preferring
    /// the live in-memory record shared with a running `start()` loop in
    /// this same process, falling back to the persisted checkpoint
    /// otherwise (spec §8 property 4: "every operation persists state
    /// before returning success").
    fn mutate<F>(&self, f: F) -> Result<(), OrchestratorError>
    where
        F: FnOnce(&mut RunRecord) -> Result<(), OrchestratorError>,
    {
        let mut guard = self.inner.record.lock();
        if let Some(record) = guard.as_mut() {
            f(record)?;
            self.inner.store.save(&self.inner.feature, record)?;
            return Ok(());
        }
        drop(guard);
        let mut record = self
            .inner
            .store
            .load(&self.inner.feature)?
            .ok_or_else(|| OrchestratorError::NoSuchRun(self.inner.feature.clone()))?;
        f(&mut record)?;
        self.inner.store.save(&self.inner.feature, &record)?;
        Ok(())
    }

    /// Pause the run: forbid new dispatches, let in-flight tasks finish
    /// naturally (spec §6 `pause`).
    pub fn pause(&self) -> Result<(), OrchestratorError> {
        let now = self.now_ms();
        self.mutate(|record| {
            record.paused = true;
            record.state = RunState::Paused;
            record.push_event(RunEvent {
                at_epoch_ms: now,
                kind: "run_paused".to_string(),
                message: "run paused by operator".to_string(),
                task_id: None,
            });
            Ok(())
        })
    }

    /// Resume a paused run (spec §6 `resume`).
    pub fn resume(&self) -> Result<(), OrchestratorError> {
        let now = self.now_ms();
        self.mutate(|record| {
            record.paused = false;
            record.state = RunState::Running;
            record.push_event(RunEvent {
                at_epoch_ms: now,
                kind: "run_resumed".to_string(),
                message: "run resumed by operator".to_string(),
                task_id: None,
            });
            Ok(())
        })
    }

    /// Request a stop (spec §6 `stop`). `force` marks in-flight tasks
    /// `stale` immediately instead of waiting for them to finish. Returns
    /// once the request is durably recorded; the drain itself happens in
    /// whichever process is running the dispatch loop.
    pub fn stop(&self, force: bool) -> Result<(), OrchestratorError> {
        let now = self.now_ms();
        self.mutate(|record| {
            record.stop_requested = true;
            record.stop_force = force;
            record.push_event(RunEvent {
                at_epoch_ms: now,
                kind: "stop_requested".to_string(),
                message: format!("stop requested (force={force})"),
                task_id: None,
            });
            Ok(())
        })
    }

    /// Force-schedule a retry for one currently-`failed` task, bypassing
    /// the normal per-run retry budget check (spec §6 `retry --task`).
    pub fn retry_task(&self, task_id: &str) -> Result<(), OrchestratorError> {
        let now = self.now_ms();
        let feature = self.inner.feature.clone();
        let task_id_owned = task_id.to_string();
        self.mutate(move |record| {
            let exec = record.tasks.get_mut(task_id_owned.as_str()).ok_or_else(|| {
                OrchestratorError::NoSuchTask { feature: feature.clone(), task_id: task_id_owned.clone() }
            })?;
            if exec.status != TaskStatus::Failed {
                return Err(OrchestratorError::NotFailed(task_id_owned.clone()));
            }
            exec.schedule_retry(now);
            record.push_event(RunEvent {
                at_epoch_ms: now,
                kind: "task_retry_forced".to_string(),
                message: format!("operator forced retry of {task_id_owned}"),
                task_id: Some(TaskId::from_string(&task_id_owned)),
            });
            Ok(())
        })
    }

    /// Force-schedule a retry for every currently-`failed` task (spec §6
    /// `retry --all-failed`).
    pub fn retry_all_failed(&self) -> Result<usize, OrchestratorError> {
        let now = self.now_ms();
        let mut retried = 0usize;
        self.mutate(|record| {
            let failed_ids: Vec<String> = record
                .tasks
                .iter()
                .filter(|(_, exec)| exec.status == TaskStatus::Failed)
                .map(|(id, _)| id.clone())
                .collect();
            for id in &failed_ids {
                if let Some(exec) = record.tasks.get_mut(id.as_str()) {
                    exec.schedule_retry(now);
                }
            }
            retried = failed_ids.len();
            record.push_event(RunEvent {
                at_epoch_ms: now,
                kind: "task_retry_forced".to_string(),
                message: format!("operator forced retry of {retried} failed task(s)"),
                task_id: None,
            });
            Ok(())
        })?;
        Ok(retried)
    }

    /// Side-effect-free status snapshot (spec §4.1 "Status contract", §8
    /// property 9): never touches the state store, only reads whichever
    /// record is live.
    pub fn get_status(&self, level: Option<u32>) -> Result<StatusSnapshot, OrchestratorError> {
        let now = self.now_ms();
        let heartbeat_staleness_ms = self.inner.config.heartbeat_staleness_ms;
        let guard = self.inner.record.lock();
        if let Some(record) = guard.as_ref() {
            return Ok(status::snapshot(record, &self.inner.task_levels, level, now, heartbeat_staleness_ms));
        }
        drop(guard);
        let record = self
            .inner
            .store
            .load(&self.inner.feature)?
            .ok_or_else(|| OrchestratorError::NoSuchRun(self.inner.feature.clone()))?;
        Ok(status::snapshot(&record, &self.inner.task_levels, level, now, heartbeat_staleness_ms))
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
