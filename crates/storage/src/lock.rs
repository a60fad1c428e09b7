// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Advisory Feature Lock (spec §4.4): a content-based, self-expiring
//! file lock, deliberately distinct from the teacher's `fs2`-based OS
//! `flock` (see `daemon::lifecycle::startup`) — this lock's staleness is
//! judged from its own written timestamp, not OS lock ownership, so that an
//! abandoned lock auto-heals after the horizon without requiring the
//! original process to still exist.

use crate::error::LockError;
use std::fs;
use std::path::PathBuf;

/// Default staleness horizon: sized to exceed any plausible run but short
/// enough that operator-abandoned locks auto-heal (spec §4.4 rationale).
pub const DEFAULT_STALENESS_HORIZON_SECS: u64 = 2 * 60 * 60;

/// Snapshot of an active lock's holder, returned by [`AdvisoryLock::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockHolder {
    pub pid: u32,
    pub acquired_at_epoch_secs: u64,
    pub age_secs: u64,
}

pub struct AdvisoryLock {
    root: PathBuf,
    staleness_horizon_secs: u64,
}

impl AdvisoryLock {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), staleness_horizon_secs: DEFAULT_STALENESS_HORIZON_SECS }
    }

    pub fn with_staleness_horizon_secs(mut self, horizon_secs: u64) -> Self {
        self.staleness_horizon_secs = horizon_secs;
        self
    }

    fn lock_path(&self, feature: &str) -> PathBuf {
        self.root.join(format!("{feature}.lock"))
    }

    /// Attempt to acquire the lock for `feature` as of `now_epoch_secs`.
    /// Succeeds when the file is absent, unparseable, or older than the
    /// staleness horizon; in every success case the file is overwritten
    /// with this process's pid and `now_epoch_secs`.
    pub fn acquire(&self, feature: &str, now_epoch_secs: u64) -> Result<(), LockError> {
        let path = self.lock_path(feature);
        match self.read_holder(feature, now_epoch_secs)? {
            Some(holder) => {
                return Err(LockError::Held {
                    feature: feature.to_string(),
                    holder_pid: holder.pid,
                    age_secs: holder.age_secs,
                })
            }
            None => {
                if path.is_file() {
                    tracing::warn!(feature, "stale or unparseable advisory lock reclaimed");
                }
            }
        }
        fs::create_dir_all(&self.root)
            .map_err(|source| LockError::Io { path: self.root.display().to_string(), source })?;
        let contents = format!("{}:{}", std::process::id(), now_epoch_secs);
        fs::write(&path, contents)
            .map_err(|source| LockError::Io { path: path.display().to_string(), source })?;
        tracing::info!(feature, pid = std::process::id(), "advisory lock acquired");
        Ok(())
    }

    /// Release the lock for `feature`. A missing file is not an error.
    pub fn release(&self, feature: &str) -> Result<(), LockError> {
        let path = self.lock_path(feature);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(feature, "advisory lock released");
                Ok(())
            }
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(LockError::Io { path: path.display().to_string(), source }),
        }
    }

    /// The current holder, if any and not stale as of `now_epoch_secs`.
    pub fn check(
        &self,
        feature: &str,
        now_epoch_secs: u64,
    ) -> Result<Option<LockHolder>, LockError> {
        self.read_holder(feature, now_epoch_secs)
    }

    fn read_holder(
        &self,
        feature: &str,
        now_epoch_secs: u64,
    ) -> Result<Option<LockHolder>, LockError> {
        let path = self.lock_path(feature);
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(LockError::Io { path: path.display().to_string(), source }),
        };
        let Some((pid, acquired_at)) = parse_lock_contents(&contents) else {
            return Ok(None);
        };
        let age_secs = now_epoch_secs.saturating_sub(acquired_at);
        if age_secs > self.staleness_horizon_secs {
            return Ok(None);
        }
        Ok(Some(LockHolder { pid, acquired_at_epoch_secs: acquired_at, age_secs }))
    }
}

fn parse_lock_contents(contents: &str) -> Option<(u32, u64)> {
    let (pid_str, ts_str) = contents.trim().split_once(':')?;
    let pid = pid_str.parse().ok()?;
    let acquired_at = ts_str.parse().ok()?;
    Some((pid, acquired_at))
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
