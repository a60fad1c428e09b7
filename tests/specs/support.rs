//! Shared fixture for the black-box specs: a scratch directory, a task
//! graph JSON builder matching `zerg-graph`'s on-disk schema, and a thin
//! wrapper around the `zerg` binary.

use assert_cmd::cargo::CommandCargoExt;
use assert_cmd::Command as AssertCommand;
use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;
use std::time::Duration;
use tempfile::TempDir;

/// How long scenarios are willing to poll for an asynchronous condition
/// (dispatch, completion, daemon-equivalent shutdown) before giving up.
pub const SPEC_WAIT_MAX_MS: u64 = 10_000;

/// Poll `check` every 50ms until it returns `true` or `max_ms` elapses,
/// returning the final observation either way.
pub fn wait_for(max_ms: u64, mut check: impl FnMut() -> bool) -> bool {
    let step = Duration::from_millis(50);
    let deadline = std::time::Instant::now() + Duration::from_millis(max_ms);
    loop {
        if check() {
            return true;
        }
        if std::time::Instant::now() >= deadline {
            return check();
        }
        std::thread::sleep(step);
    }
}

/// One scratch feature environment: a tempdir holding `.zerg/` (state,
/// locks, logs) and the feature's task graph document.
pub struct Fixture {
    tmp: TempDir,
    graph_path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        Self { tmp, graph_path: PathBuf::new() }
    }

    pub fn workdir(&self) -> &Path {
        self.tmp.path()
    }

    pub fn root(&self) -> PathBuf {
        self.tmp.path().join(".zerg")
    }

    pub fn state_path(&self, feature: &str) -> PathBuf {
        self.root().join("state").join(format!("{feature}.json"))
    }

    pub fn lock_path(&self, feature: &str) -> PathBuf {
        self.root().join("locks").join(format!("{feature}.lock"))
    }

    /// Write the task graph JSON document, discoverable by subsequent
    /// `zerg()` invocations via `--graph`.
    pub fn write_graph(&mut self, json: &str) -> &Path {
        let path = self.tmp.path().join("graph.json");
        std::fs::write(&path, json).expect("write graph fixture");
        self.graph_path = path;
        &self.graph_path
    }

    /// Touch an extra file under the feature's working directory, the way
    /// a project fixture seeds source files for its verification commands.
    pub fn file(&self, relative: &str, contents: &str) {
        let path = self.tmp.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(path, contents).expect("write fixture file");
    }

    pub fn read_state(&self, feature: &str) -> serde_json::Value {
        let contents = std::fs::read_to_string(self.state_path(feature))
            .unwrap_or_else(|err| panic!("reading state for {feature:?}: {err}"));
        serde_json::from_str(&contents).expect("state record is valid JSON")
    }

    pub fn state_exists(&self, feature: &str) -> bool {
        self.state_path(feature).is_file()
    }

    /// An `assert_cmd` command pre-wired with `--root`/`--graph`/`--workdir`,
    /// for scenarios that wait synchronously on the child process.
    pub fn zerg(&self) -> AssertCommand {
        let mut cmd = AssertCommand::cargo_bin("zerg").expect("zerg binary built");
        cmd.arg("--root")
            .arg(self.root())
            .arg("--graph")
            .arg(&self.graph_path)
            .arg("--workdir")
            .arg(self.workdir());
        cmd
    }

    /// A plain `std::process::Command`, for scenarios that need to spawn
    /// `zerg start` in the background and kill it mid-run (spec §8
    /// property 3, "crash safety").
    pub fn zerg_std(&self) -> StdCommand {
        let mut cmd = StdCommand::cargo_bin("zerg").expect("zerg binary built");
        cmd.arg("--root")
            .arg(self.root())
            .arg("--graph")
            .arg(&self.graph_path)
            .arg("--workdir")
            .arg(self.workdir());
        cmd
    }
}

/// One task entry in the graph document's `tasks` array.
pub fn task(
    id: &str,
    level: u32,
    dependencies: &[&str],
    verification_command: &str,
    estimate_minutes: u32,
    critical_path: bool,
) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": format!("task {id}"),
        "level": level,
        "dependencies": dependencies,
        "verification": {"command": verification_command, "timeout_secs": 5},
        "estimate_minutes": estimate_minutes,
        "critical_path": critical_path,
    })
}

/// The graph document itself (spec §6 "Task graph format (on disk)").
pub fn graph(feature: &str, tasks: Vec<serde_json::Value>) -> String {
    serde_json::json!({
        "feature": feature,
        "version": "1",
        "schema_version": 1,
        "task_count": tasks.len(),
        "tasks": tasks,
    })
    .to_string()
}

/// A verification command that passes once `touch "marker-$ZERG_TASK_ID"`
/// has run in this task's working directory — the shared idiom every
/// scenario's `--impl-cmd` relies on to flip red to green.
pub fn marker_check(task_id: &str) -> String {
    format!("test -f marker-{task_id}")
}

/// The standard Red-step command: always exits zero, narrates nothing
/// notable.
pub const WRITE_TEST_CMD: &str = "true";

/// The standard Green-step command: creates the marker the task's
/// verification command checks for.
pub const WRITE_IMPL_CMD: &str = "touch \"marker-$ZERG_TASK_ID\"";
